use super::*;

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

///The socket family a layer 3 send goes out on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SocketKind {
    Ipv4,
    Ipv6,
    Icmp,
    IcmpV6,
}

///Error surfaced by a [`PacketSender`] implementation.
#[derive(Debug)]
pub enum SendError {
    ///Whenever an std::io::Error gets triggered during a send it gets forwarded via this enum value.
    IoError(std::io::Error),
    ///The named interface could not be resolved.
    InvalidInterface(InvalidInterfaceError),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::IoError(err) => err.fmt(f),
            SendError::InvalidInterface(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for SendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SendError::IoError(ref err) => Some(err),
            SendError::InvalidInterface(ref err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SendError {
    fn from(err: std::io::Error) -> SendError {
        SendError::IoError(err)
    }
}

impl From<InvalidInterfaceError> for SendError {
    fn from(err: InvalidInterfaceError) -> SendError {
        SendError::InvalidInterface(err)
    }
}

///Injection seam for serialized packets. This crate performs no I/O itself;
///capture & injection backends implement this trait.
///
///802.11 frames go out over [`PacketSender::send_l2`] with the index of the
///outgoing interface; IPv6 packets go out over [`PacketSender::send_l3`] with
///the destination address, a zero port and the socket kind picked via
///[`socket_kind_for`].
pub trait PacketSender {
    ///Sends a serialized layer 2 frame on the interface with the given index.
    fn send_l2(&mut self, frame: &Pdu, interface_index: u32) -> Result<(), SendError>;

    ///Sends a serialized layer 3 packet to the given destination.
    fn send_l3(&mut self, packet: &Pdu, destination: IpAddr, kind: SocketKind) -> Result<(), SendError>;
}

///Picks the socket kind an IPv6 unit is sent over: the ICMP socket when the
///payload below the extension headers is ICMPv6, the plain IPv6 socket
///otherwise.
pub fn socket_kind_for(packet: &Ipv6Pdu) -> SocketKind {
    if ip_number::IPV6_ICMP == packet.last_next_header() {
        SocketKind::IcmpV6
    } else {
        SocketKind::Ipv6
    }
}

///Description of a network interface as returned by an
///[`InterfaceResolver`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NetworkInterfaceInfo {
    ///OS interface index.
    pub index: u32,
    ///Hardware address of the interface.
    pub hw_addr: MacAddr,
    ///Primary IPv4 address.
    pub ipv4: Ipv4Addr,
    ///Netmask belonging to the IPv4 address.
    pub netmask: Ipv4Addr,
    ///Broadcast address, or zero for point to point interfaces.
    pub broadcast: Ipv4Addr,
    ///True if the interface is up.
    pub is_up: bool,
}

///Resolution seam from interface names & destinations to interface
///descriptions. Implemented by OS specific backends outside of this crate.
pub trait InterfaceResolver {
    ///Resolves a textual interface name.
    fn by_name(&self, name: &str) -> Result<NetworkInterfaceInfo, InvalidInterfaceError>;

    ///Returns the interface whose routing table entry matches the destination
    ///with the longest mask and the smallest metric. The loopback address
    ///resolves to the platform specific loopback device.
    fn for_destination(&self, destination: Ipv4Addr) -> Result<NetworkInterfaceInfo, InvalidInterfaceError>;
}

//! A library for crafting & dissecting stacked packet based protocols (IPv6, DNS, IEEE 802.11 ...).
//!
//! Currently supported are:
//! * IPv6 (including extension header chains)
//! * DNS (including compressed name decoding & section editing)
//! * IEEE 802.11 (management, data & QoS data frames with tagged parameters)
//! * LLC+SNAP
//! * TCP & UDP (minimal headers, checksum support)
//!
//! # What is wirecraft?
//! Wirecraft models a packet as a chain of protocol units ([`Pdu`]): every unit owns
//! its header fields plus an optional inner unit. Parsing a byte buffer produces such
//! a chain, every field can be mutated in memory afterwards, and serializing the chain
//! recomputes the self-referential fields (length fields, next-header chains,
//! checksums) before emitting wire-format bytes.
//!
//! Some key points are:
//!
//! * Parsers fail fast with typed errors and never produce a partial unit.
//! * Payloads that can not be identified do not fail the parse, they are wrapped
//!   as an opaque [`RawPdu`].
//! * The decoder for a numeric next-protocol id is picked through a process wide
//!   dispatch registry that applications can extend ([`register_pdu`] &
//!   [`register_ipv6_ext`]).
//!
//! # How to dissect a packet?
//!
//! Each unit type has a `from_bytes` constructor that parses the unit and
//! everything below it:
//!
//! ```
//! # use wirecraft::*;
//! # let buffer = {
//! #     let mut ip = Ipv6Pdu::new();
//! #     ip.set_hop_limit(64);
//! #     (Pdu::Ipv6(ip) / Pdu::Raw(RawPdu::new(vec![1,2,3]))).serialize()
//! # };
//! match Ipv6Pdu::from_bytes(&buffer) {
//!     Err(err) => println!("Err {:?}", err),
//!     Ok(ip) => {
//!         println!("source: {}", ip.source_addr());
//!         println!("inner: {:?}", ip.inner().map(|p| p.pdu_type()));
//!     }
//! }
//! ```
//!
//! # How to craft a packet?
//!
//! Units are built with explicit fields and stacked with the `/` operator. The
//! serialization step fills in everything that can be deduced from the chain
//! itself (payload lengths, the next-header chain, checksums):
//!
//! ```
//! use wirecraft::*;
//!
//! let mut ip = Ipv6Pdu::new();
//! ip.set_hop_limit(64);
//!
//! let udp = UdpPdu::new(5353, 5353);
//!
//! let packet = Pdu::Ipv6(ip) / Pdu::Udp(udp) / Pdu::Raw(RawPdu::new(vec![1,2,3,4]));
//! let bytes = packet.serialize();
//! assert_eq!(bytes.len(), packet.size());
//! ```
//!
//! # References
//! * Internet Protocol, Version 6 (IPv6) Specification [RFC 8200](https://tools.ietf.org/html/rfc8200)
//! * Domain Names - Implementation and Specification [RFC 1035](https://tools.ietf.org/html/rfc1035)
//! * DNS Extensions to Support IP Version 6 [RFC 3596](https://tools.ietf.org/html/rfc3596)
//! * IEEE Std 802.11-2012 frame layouts
//! * [IANA Protocol Numbers](https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml)
//! * User Datagram Protocol (UDP) [RFC 768](https://tools.ietf.org/html/rfc768)
//! * Transmission Control Protocol [RFC 793](https://tools.ietf.org/html/rfc793)

use std::fmt;
use std::error::Error;

mod bytestream;
pub use crate::bytestream::*;

mod address;
pub use crate::address::*;

mod pdu;
pub use crate::pdu::*;

mod registry;
pub use crate::registry::*;

mod link;
pub use crate::link::dot11::*;
pub use crate::link::dot11_mgmt::*;
pub use crate::link::snap::*;

mod internet;
pub use crate::internet::ipv6::*;

mod transport;
pub use crate::transport::tcp::*;
pub use crate::transport::udp::*;

mod application;
pub use crate::application::dns::*;

mod sender;
pub use crate::sender::*;

///Errors that can occur when parsing a packet. Parsers fail fast at the point
///of detection and never produce a partially initialized unit.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ReadError {
    ///Error when an unexpected end of a slice was reached even though more data was expected to be present (expected minimum size as argument).
    UnexpectedEndOfSlice(usize),
    ///Error when the ip header version field is not equal 6. The value is the version that was received.
    Ipv6UnexpectedVersion(u8),
    ///Error when a DNS compression pointer points before the start of the records data (< 12) or past its end. The value is the raw 14 bit pointer target.
    DnsPointerOutOfRange(u16),
    ///Error when a decoded domain name would exceed the maximum of 255 bytes (including dots). The value is the length the name would have had.
    DnsNameTooLong(usize),
    ///Error when following DNS compression pointers exceeds the label depth bound (loop protection).
    DnsCompressionLoop,
    ///Error when the length fields inside an RSN information element are inconsistent with the element length. The value is the element length.
    Dot11RsnInvalidLength(usize),
    ///Error given if the data_offset field in a TCP header is smaller then the minimum size of the tcp header itself.
    TcpDataOffsetTooSmall(u8),
}

impl ReadError {
    /// Returns the expected minimum size if the error is an `UnexpectedEndOfSlice`.
    pub fn unexpected_end_of_slice_min_expected_size(self) -> Option<usize> {
        match self {
            ReadError::UnexpectedEndOfSlice(value) => Some(value),
            _ => None
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ReadError::*;

        match self {
            UnexpectedEndOfSlice(expected_minimum_size) => {
                write!(f, "ReadError: Unexpected end of slice. The given slice contained less then minimum required {} bytes.", expected_minimum_size)
            },
            Ipv6UnexpectedVersion(version_number) => {
                write!(f, "ReadError: Unexpected IP version number. Expected an IPv6 Header but the header contained the version number {}.", version_number)
            },
            DnsPointerOutOfRange(pointer) => {
                write!(f, "ReadError: DNS compression pointer {} points outside of the packet (must be >= 12 and inside the records data).", pointer)
            },
            DnsNameTooLong(len) => {
                write!(f, "ReadError: Decoded DNS domain name would be {} bytes long which is larger then the maximum of 255 bytes.", len)
            },
            DnsCompressionLoop => {
                write!(f, "ReadError: Too many DNS labels or compression pointer redirections while decoding a domain name (loop protection).")
            },
            Dot11RsnInvalidLength(len) => {
                write!(f, "ReadError: The suite counts inside the RSN information element are inconsistent with the element length of {} bytes.", len)
            },
            TcpDataOffsetTooSmall(data_offset) => {
                write!(f, "ReadError: TCP data offset too small. The data offset value {} in the tcp header is smaller then the tcp header itself.", data_offset)
            },
        }
    }
}

impl Error for ReadError {}

///Errors in the given data
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ValueError {
    ///Error when a given payload & extension header block is bigger then what fits inside an ipv6 payload_length field.
    Ipv6PayloadLengthTooLarge(usize),
    ///Error when a given extension header payload length is not aligned to be a multiple of 8 octets when 2 is added (the first 2 octets of every extension header are the next_header & length fields).
    Ipv6ExtensionPayloadLengthUnaligned(usize),
    ///Error when a single DNS label is longer then the maximum of 63 bytes.
    DnsLabelTooLong(usize),
    ///Error when an encoded DNS domain name would be longer then the maximum of 255 bytes.
    DnsNameTooLong(usize),
    ///Error when the tcp options length is too big or not aligned (cannot be bigger then 40 bytes and must be a multiple of 4 bytes).
    TcpOptionsLengthBad(usize),
    ///Error when a u8 field in a header has a larger value then supported.
    U8TooLarge{value: u8, max: u8, field: ErrorField},
    ///Error when a u16 field in a header has a larger value then supported.
    U16TooLarge{value: u16, max: u16, field: ErrorField},
    ///Error when a u32 field in a header has a larger value then supported.
    U32TooLarge{value: u32, max: u32, field: ErrorField}
}

impl Error for ValueError {

}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ValueError::*;
        match self {
            Ipv6PayloadLengthTooLarge(size) => {
                write!(f, "IPv6 'payload_length' too large. The IPv6 extension headers & payload size ({} bytes) is larger then what can be be represented by the 'payload_length' field in the IPv6 header.", size)
            },
            Ipv6ExtensionPayloadLengthUnaligned(size) => {
                write!(f, "IPv6 extensions header 'payload length ({} bytes) + 2' is not a multiple of 8 (+ 2 for the `next_header` and `header_length` fields). This is required as the header length field can only express lengths in multiple of 8 bytes.", size)
            },
            DnsLabelTooLong(size) => {
                write!(f, "DNS label too long. A single label in a domain name can be at most 63 bytes long ({} bytes given).", size)
            },
            DnsNameTooLong(size) => {
                write!(f, "DNS domain name too long. An encoded domain name can be at most 255 bytes long ({} bytes given).", size)
            },
            TcpOptionsLengthBad(options_len) => {
                write!(f, "Bad TCP options length. The options length ({} bytes) is either not a multiple of 4 bytes or bigger then the maximum of 40 bytes.", options_len)
            },
            U8TooLarge{value, max, field} => {
                write!(f, "The value {} of the field '{}' is larger then the allowed maximum of {}.", value, field, max)
            },
            U16TooLarge{value, max, field} => {
                write!(f, "The value {} of the field '{}' is larger then the allowed maximum of {}.", value, field, max)
            },
            U32TooLarge{value, max, field} => {
                write!(f, "The value {} of the field '{}' is larger then the allowed maximum of {}.", value, field, max)
            }
        }
    }
}

///Fields that can produce errors when set to a value that does not fit.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorField {
    Ipv6FlowLabel,
    ///Dot11Header.sequence_control fragment number (4 bit)
    Dot11FragmentNumber,
    ///Dot11Header.sequence_control sequence number (12 bit)
    Dot11SequenceNumber,
}

impl fmt::Display for ErrorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorField::*;
        match self {
            Ipv6FlowLabel => write!(f, "Ipv6Pdu.flow_label"),
            Dot11FragmentNumber => write!(f, "Dot11Header.fragment_number"),
            Dot11SequenceNumber => write!(f, "Dot11Header.sequence_number"),
        }
    }
}

///Error when registering a parser in one of the dispatch registries.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RegistryError {
    ///Error when an id is already registered with a different constructor or
    ///protocol identity. Registering the exact same value twice is allowed.
    ConflictingRegistration{ id: u8 },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::ConflictingRegistration{ id } => {
                write!(f, "RegistryError: The protocol id {} is already registered with a conflicting constructor.", id)
            }
        }
    }
}

impl Error for RegistryError {}

///Error when a textual interface name can not be resolved by an
///[`InterfaceResolver`] implementation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidInterfaceError {
    ///The interface name that could not be resolved.
    pub name: String,
}

impl fmt::Display for InvalidInterfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InvalidInterfaceError: The network interface '{}' does not exist or could not be resolved.", self.name)
    }
}

impl Error for InvalidInterfaceError {}

pub(crate) fn max_check_u8(value: u8, max: u8, field: ErrorField) -> Result<(), ValueError> {
    if value <= max {
        Ok(())
    } else {
        Err(ValueError::U8TooLarge {
            value,
            max,
            field
        })
    }
}

pub(crate) fn max_check_u16(value: u16, max: u16, field: ErrorField) -> Result<(), ValueError> {
    if value <= max {
        Ok(())
    } else {
        Err(ValueError::U16TooLarge{
            value,
            max,
            field
        })
    }
}

pub(crate) fn max_check_u32(value: u32, max: u32, field: ErrorField) -> Result<(), ValueError> {
    if value <= max {
        Ok(())
    } else {
        Err(ValueError::U32TooLarge{
            value,
            max,
            field
        })
    }
}

use super::super::*;

extern crate byteorder;
use self::byteorder::{ByteOrder, BigEndian};

///Size of the udp header in bytes.
pub const UDP_HEADER_SIZE: usize = 8;

///UDP protocol unit with a header according to rfc768.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UdpPdu {
    ///Source port of the packet (optional).
    pub source_port: u16,
    ///Destination port of the packet.
    pub destination_port: u16,
    ///Length of the packet as read from the wire (includes the udp header
    ///length of 8 bytes). Recomputed from the actual chain size when
    ///serializing.
    pub length: u16,
    ///Checksum as read from the wire. Recomputed over the parent pseudo header
    ///& the payload when the unit is serialized below an IPv6 unit.
    pub checksum: u16,
    inner: Option<Box<Pdu>>,
}

impl UdpPdu {

    ///Creates an udp unit with the given ports and no payload.
    pub fn new(source_port: u16, destination_port: u16) -> UdpPdu {
        UdpPdu {
            source_port,
            destination_port,
            length: UDP_HEADER_SIZE as u16,
            checksum: 0,
            inner: None,
        }
    }

    ///Parses an udp unit from the given buffer, wrapping the payload as a
    ///[`RawPdu`].
    pub fn from_bytes(buffer: &[u8]) -> Result<UdpPdu, ReadError> {
        let mut reader = ByteReader::new(buffer);

        Ok(UdpPdu {
            source_port: reader.read_u16_be()?,
            destination_port: reader.read_u16_be()?,
            length: reader.read_u16_be()?,
            checksum: reader.read_u16_be()?,
            inner: Some(Box::new(Pdu::Raw(RawPdu::from_bytes(reader.pointer())))),
        })
    }

    ///Registry constructor: parses & wraps the unit into a [`Pdu`].
    pub fn parse_pdu(buffer: &[u8]) -> Result<Pdu, ReadError> {
        Ok(Pdu::Udp(UdpPdu::from_bytes(buffer)?))
    }

    ///Serialized size of the header.
    pub fn header_size(&self) -> usize {
        UDP_HEADER_SIZE
    }

    ///Returns a reference to the owned inner unit.
    pub fn inner(&self) -> Option<&Pdu> {
        self.inner.as_deref()
    }

    ///Returns a mutable reference to the owned inner unit.
    pub fn inner_mut(&mut self) -> Option<&mut Pdu> {
        self.inner.as_deref_mut()
    }

    ///Replaces the owned inner unit, dropping the previous one.
    pub fn set_inner(&mut self, inner: Pdu) {
        self.inner = Some(Box::new(inner));
    }

    ///Removes and returns the owned inner unit.
    pub fn take_inner(&mut self) -> Option<Pdu> {
        self.inner.take().map(|boxed| *boxed)
    }

    pub(crate) fn write_header(&self, buffer: &mut [u8], total_size: usize) {
        let mut writer = ByteWriter::new(buffer);
        writer.write_u16_be(self.source_port);
        writer.write_u16_be(self.destination_port);
        //the length field covers the header & the payload
        writer.write_u16_be(total_size as u16);
        writer.write_u16_be(self.checksum);
    }

    //The checksum covers the payload & the parent pseudo header, so it is
    //patched in after the inner chain was written.
    pub(crate) fn patch_checksum(&self, buffer: &mut [u8], parent: Option<&Pdu>) {
        if let Some(Pdu::Ipv6(ip)) = parent {
            let pseudo = super::ipv6_pseudo_header_sum(&ip.source, &ip.destination, ip_number::UDP, buffer.len());
            let checksum = super::ones_complement_checksum(pseudo, buffer, 6);
            //an all zero checksum is reserved for "checksum disabled"
            let checksum = if 0 == checksum {
                0xffff
            } else {
                checksum
            };
            BigEndian::write_u16(&mut buffer[6..8], checksum);
        }
    }

    ///A buffer matches as a response when the ports are mirrored.
    pub fn matches_response(&self, buffer: &[u8]) -> bool {
        if buffer.len() < 4 {
            return false;
        }
        let response_source = BigEndian::read_u16(&buffer[..2]);
        let response_destination = BigEndian::read_u16(&buffer[2..4]);
        response_source == self.destination_port && response_destination == self.source_port
    }
}

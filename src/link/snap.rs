use super::super::*;

extern crate byteorder;
use self::byteorder::{ByteOrder, BigEndian};

///Size of the LLC+SNAP header in bytes.
pub const SNAP_HEADER_SIZE: usize = 8;

///Ether type of IPv6 payloads.
pub const ETHERTYPE_IPV6: u16 = 0x86dd;

///LLC+SNAP protocol unit: the 3 byte LLC part (dsap 0xaa, ssap 0xaa,
///control 0x03), a 3 byte organization code and the big endian ether type of
///the payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SnapPdu {
    pub org_code: [u8; 3],
    pub eth_type: u16,
    inner: Option<Box<Pdu>>,
}

impl Default for SnapPdu {
    fn default() -> SnapPdu {
        SnapPdu::new()
    }
}

impl SnapPdu {

    ///Creates a SNAP unit with a zero organization code & ether type.
    pub fn new() -> SnapPdu {
        SnapPdu {
            org_code: [0; 3],
            eth_type: 0,
            inner: None,
        }
    }

    ///Parses a SNAP unit from the given buffer. An IPv6 ether type dispatches
    ///the payload to the IPv6 parser, everything else is kept as [`RawPdu`].
    pub fn from_bytes(buffer: &[u8]) -> Result<SnapPdu, ReadError> {
        let mut reader = ByteReader::new(buffer);

        //llc part: dsap, ssap & control are fixed values and not interpreted
        reader.skip(3)?;
        let org_code = {
            let mut value = [0u8; 3];
            reader.read_exact(&mut value)?;
            value
        };
        let eth_type = reader.read_u16_be()?;

        let rest = reader.pointer();
        let inner = match eth_type {
            ETHERTYPE_IPV6 => match Ipv6Pdu::from_bytes(rest) {
                Ok(ip) => Pdu::Ipv6(ip),
                Err(_) => Pdu::Raw(RawPdu::from_bytes(rest)),
            },
            _ => Pdu::Raw(RawPdu::from_bytes(rest)),
        };

        Ok(SnapPdu {
            org_code,
            eth_type,
            inner: Some(Box::new(inner)),
        })
    }

    ///Serialized size of the header.
    pub fn header_size(&self) -> usize {
        SNAP_HEADER_SIZE
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

    pub(crate) fn write_header(&self, buffer: &mut [u8]) {
        let mut writer = ByteWriter::new(buffer);
        writer.write_u8(0xaa);
        writer.write_u8(0xaa);
        writer.write_u8(0x03);
        writer.write_slice(&self.org_code);
        writer.write_u16_be(self.eth_type);
    }

    ///A buffer matches as a response when the ether type matches and the
    ///inner unit (if any) matches the payload.
    pub fn matches_response(&self, buffer: &[u8]) -> bool {
        if buffer.len() < SNAP_HEADER_SIZE {
            return false;
        }
        if BigEndian::read_u16(&buffer[6..8]) != self.eth_type {
            return false;
        }
        match &self.inner {
            None => true,
            Some(inner) => inner.matches_response(&buffer[SNAP_HEADER_SIZE..]),
        }
    }
}

use super::super::*;

extern crate byteorder;
use self::byteorder::{ByteOrder, BigEndian};

///The minimum size of the tcp header in bytes
pub const TCP_MINIMUM_HEADER_SIZE: usize = 5*4;
///The minimum data offset size (size of the tcp header itself).
pub const TCP_MINIMUM_DATA_OFFSET: u8 = 5;

///TCP protocol unit with a header according to rfc 793.
///
///The options are kept as raw bytes; their length is derived from the data
///offset field on parse and must stay a multiple of 4 bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TcpPdu {
    ///The source port number.
    pub source_port: u16,
    ///The destination port number.
    pub destination_port: u16,
    ///The sequence number of the first data octet in this segment (except when SYN is present).
    pub sequence_number: u32,
    ///If the ACK control bit is set this field contains the value of the
    ///next sequence number the sender of the segment is expecting to receive.
    pub acknowledgment_number: u32,
    ///ECN-nonce - concealment protection (experimental: see RFC 3540)
    pub ns: bool,
    ///No more data from sender
    pub fin: bool,
    ///Synchronize sequence numbers
    pub syn: bool,
    ///Reset the connection
    pub rst: bool,
    ///Push Function
    pub psh: bool,
    ///Acknowledgment field significant
    pub ack: bool,
    ///Urgent Pointer field significant
    pub urg: bool,
    ///ECN-Echo (RFC 3168)
    pub ece: bool,
    ///Congestion Window Reduced (CWR) flag
    pub cwr: bool,
    ///The number of data octets the sender of this segment is willing to accept.
    pub window_size: u16,
    ///Checksum as read from the wire. Recomputed over the parent pseudo header
    ///& the payload when the unit is serialized below an IPv6 unit.
    pub checksum: u16,
    ///Points to the sequence number of the octet following the urgent data.
    pub urgent_pointer: u16,
    options: Vec<u8>,
    inner: Option<Box<Pdu>>,
}

impl TcpPdu {

    ///Creates a tcp unit with the given ports, everything else zeroed.
    pub fn new(source_port: u16, destination_port: u16) -> TcpPdu {
        TcpPdu {
            source_port,
            destination_port,
            sequence_number: 0,
            acknowledgment_number: 0,
            ns: false,
            fin: false,
            syn: false,
            rst: false,
            psh: false,
            ack: false,
            urg: false,
            ece: false,
            cwr: false,
            window_size: 0,
            checksum: 0,
            urgent_pointer: 0,
            options: Vec::new(),
            inner: None,
        }
    }

    ///Parses a tcp unit from the given buffer, wrapping the payload as a
    ///[`RawPdu`].
    pub fn from_bytes(buffer: &[u8]) -> Result<TcpPdu, ReadError> {
        let mut reader = ByteReader::new(buffer);

        let source_port = reader.read_u16_be()?;
        let destination_port = reader.read_u16_be()?;
        let sequence_number = reader.read_u32_be()?;
        let acknowledgment_number = reader.read_u32_be()?;
        let offset_byte = reader.read_u8()?;
        let data_offset = offset_byte >> 4;
        if data_offset < TCP_MINIMUM_DATA_OFFSET {
            return Err(ReadError::TcpDataOffsetTooSmall(data_offset));
        }
        let flags = reader.read_u8()?;
        let window_size = reader.read_u16_be()?;
        let checksum = reader.read_u16_be()?;
        let urgent_pointer = reader.read_u16_be()?;
        let options = reader
            .read_slice(usize::from(data_offset - TCP_MINIMUM_DATA_OFFSET)*4)?
            .to_vec();

        Ok(TcpPdu {
            source_port,
            destination_port,
            sequence_number,
            acknowledgment_number,
            ns: 0 != offset_byte & 1,
            fin: 0 != flags & 1,
            syn: 0 != flags & 2,
            rst: 0 != flags & 4,
            psh: 0 != flags & 8,
            ack: 0 != flags & 16,
            urg: 0 != flags & 32,
            ece: 0 != flags & 64,
            cwr: 0 != flags & 128,
            window_size,
            checksum,
            urgent_pointer,
            options,
            inner: Some(Box::new(Pdu::Raw(RawPdu::from_bytes(reader.pointer())))),
        })
    }

    ///Registry constructor: parses & wraps the unit into a [`Pdu`].
    pub fn parse_pdu(buffer: &[u8]) -> Result<Pdu, ReadError> {
        Ok(Pdu::Tcp(TcpPdu::from_bytes(buffer)?))
    }

    ///The raw option bytes of the header.
    pub fn options(&self) -> &[u8] {
        &self.options
    }

    ///Sets the raw option bytes. The length must be a multiple of 4 bytes and
    ///at most 40 bytes (data offset is a 4 bit field counting 32 bit words).
    pub fn set_options(&mut self, options: Vec<u8>) -> Result<(), ValueError> {
        if 0 != options.len() % 4 || options.len() > 40 {
            return Err(ValueError::TcpOptionsLengthBad(options.len()));
        }
        self.options = options;
        Ok(())
    }

    ///Serialized size of the header (fixed part plus options).
    pub fn header_size(&self) -> usize {
        TCP_MINIMUM_HEADER_SIZE + self.options.len()
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
        writer.write_u16_be(self.source_port);
        writer.write_u16_be(self.destination_port);
        writer.write_u32_be(self.sequence_number);
        writer.write_u32_be(self.acknowledgment_number);
        writer.write_u8({
            let value = (TCP_MINIMUM_DATA_OFFSET + (self.options.len() / 4) as u8) << 4;
            if self.ns {
                value | 1
            } else {
                value
            }
        });
        writer.write_u8({
            let mut value = 0;
            if self.fin {
                value |= 1;
            }
            if self.syn {
                value |= 2;
            }
            if self.rst {
                value |= 4;
            }
            if self.psh {
                value |= 8;
            }
            if self.ack {
                value |= 16;
            }
            if self.urg {
                value |= 32;
            }
            if self.ece {
                value |= 64;
            }
            if self.cwr {
                value |= 128;
            }
            value
        });
        writer.write_u16_be(self.window_size);
        writer.write_u16_be(self.checksum);
        writer.write_u16_be(self.urgent_pointer);
        writer.write_slice(&self.options);
    }

    //The checksum covers the payload & the parent pseudo header, so it is
    //patched in after the inner chain was written.
    pub(crate) fn patch_checksum(&self, buffer: &mut [u8], parent: Option<&Pdu>) {
        if let Some(Pdu::Ipv6(ip)) = parent {
            let pseudo = super::ipv6_pseudo_header_sum(&ip.source, &ip.destination, ip_number::TCP, buffer.len());
            let checksum = super::ones_complement_checksum(pseudo, buffer, 16);
            BigEndian::write_u16(&mut buffer[16..18], checksum);
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

use super::super::*;

use tracing::trace;

use std::net::Ipv6Addr;

///Size of the fixed IPv6 header in bytes.
pub const IPV6_HEADER_SIZE: usize = 40;

/// Module containing the u8 constants of the ip protocol numbers used by this
/// library.
///
/// The values were copied from
/// <https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml>
pub mod ip_number {
    ///IPv6 Hop-by-Hop Option \[[RFC8200](https://datatracker.ietf.org/doc/html/rfc8200)\]
    pub const IPV6_HOP_BY_HOP: u8 = 0;
    ///Internet Control Message \[[RFC792](https://datatracker.ietf.org/doc/html/rfc792)\]
    pub const ICMP: u8 = 1;
    ///Transmission Control \[[RFC793](https://datatracker.ietf.org/doc/html/rfc793)\]
    pub const TCP: u8 = 6;
    ///User Datagram \[[RFC768](https://datatracker.ietf.org/doc/html/rfc768)\]
    pub const UDP: u8 = 17;
    ///Routing Header for IPv6
    pub const IPV6_ROUTE: u8 = 43;
    ///Fragment Header for IPv6
    pub const IPV6_FRAG: u8 = 44;
    ///Encapsulating Security Payload \[[RFC4303](https://datatracker.ietf.org/doc/html/rfc4303)\]
    pub const ENCAP_SEC: u8 = 50;
    ///Authentication Header \[[RFC4302](https://datatracker.ietf.org/doc/html/rfc4302)\]
    pub const AUTH: u8 = 51;
    ///ICMP for IPv6 \[[RFC8200](https://datatracker.ietf.org/doc/html/rfc8200)\]
    pub const IPV6_ICMP: u8 = 58;
    ///No Next Header for IPv6 \[[RFC8200](https://datatracker.ietf.org/doc/html/rfc8200)\]
    pub const IPV6_NO_NEXT_HEADER: u8 = 59;
    ///Destination Options for IPv6 \[[RFC8200](https://datatracker.ietf.org/doc/html/rfc8200)\]
    pub const IPV6_DEST_OPTIONS: u8 = 60;
    ///MobilityHeader \[[RFC6275](https://datatracker.ietf.org/doc/html/rfc6275)\]
    pub const MOBILITY: u8 = 135;
}

///Returns true if the given protocol number names an IPv6 extension header.
pub fn is_ipv6_extension(value: u8) -> bool {
    use crate::ip_number::*;
    match value {
        IPV6_HOP_BY_HOP | IPV6_ROUTE | IPV6_FRAG | ENCAP_SEC | AUTH
        | IPV6_NO_NEXT_HEADER | IPV6_DEST_OPTIONS | MOBILITY => true,
        _ => false
    }
}

///One IPv6 extension header.
///
///`option` is the next-header discriminator written at the start of this
///header on the wire (it names the layer that follows this header). The data
///holds everything after the two control bytes; its length always satisfies
///`(len + 2) % 8 == 0` as the length field of an extension header can only
///express multiples of 8 octets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ipv6ExtHeader {
    ///Protocol number of the content after this header.
    pub option: u8,
    data: Vec<u8>,
}

impl Ipv6ExtHeader {

    ///Creates an extension header with the given payload.
    ///
    ///The payload must not contain the `next header` & `header length` control
    ///bytes and its length must fulfill `(payload.len() + 2) % 8 == 0`.
    pub fn new(option: u8, payload: Vec<u8>) -> Result<Ipv6ExtHeader, ValueError> {
        if 0 != (payload.len() + 2) % 8 {
            Err(ValueError::Ipv6ExtensionPayloadLengthUnaligned(payload.len()))
        } else {
            Ok(Ipv6ExtHeader {
                option,
                data: payload
            })
        }
    }

    ///The payload of the header (everything after the two control bytes).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    ///Length of the header in bytes when serialized.
    pub fn header_len(&self) -> usize {
        2 + self.data.len()
    }
}

///IPv6 protocol unit: the fixed header according to rfc8200, the chain of
///extension headers & the owned inner unit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ipv6Pdu {
    pub traffic_class: u8,
    ///If non 0 serves as a hint to routers and switches with multiple outbound paths that these packets should stay on the same path, so that they will not be reordered.
    flow_label: u32,
    ///The length of the payload and extension headers in bytes as read from the wire. Recomputed from the actual chain size when serializing.
    pub payload_length: u16,
    ///Protocol number of the first extension header, or of the payload if there are none.
    pub next_header: u8,
    ///The number of hops the packet can take before it is discarded.
    pub hop_limit: u8,
    ///IPv6 source address
    pub source: [u8;16],
    ///IPv6 destination address
    pub destination: [u8;16],
    ext_headers: Vec<Ipv6ExtHeader>,
    inner: Option<Box<Pdu>>,
}

impl Default for Ipv6Pdu {
    fn default() -> Ipv6Pdu {
        Ipv6Pdu::new()
    }
}

impl Ipv6Pdu {

    ///Creates an IPv6 unit with zeroed addresses, no extension headers and no
    ///inner unit.
    pub fn new() -> Ipv6Pdu {
        Ipv6Pdu {
            traffic_class: 0,
            flow_label: 0,
            payload_length: 0,
            next_header: ip_number::IPV6_NO_NEXT_HEADER,
            hop_limit: 0,
            source: [0;16],
            destination: [0;16],
            ext_headers: Vec::new(),
            inner: None,
        }
    }

    ///Parses an IPv6 unit (and everything below it) from the given buffer.
    ///
    ///After the fixed header the extension header chain is walked along its
    ///next-header discriminators. The first discriminator that does not name
    ///an extension header selects the inner parser through the dispatch
    ///registry, falling back to the IPv6 allocator registry and finally to
    ///[`RawPdu`].
    pub fn from_bytes(buffer: &[u8]) -> Result<Ipv6Pdu, ReadError> {
        let mut reader = ByteReader::new(buffer);

        let value = reader.read_u8()?;
        let version = value >> 4;
        if 6 != version {
            return Err(ReadError::Ipv6UnexpectedVersion(version));
        }

        //traffic class & flow label are not byte aligned
        let tc_flow = reader.read_u8()?;
        let traffic_class = (value << 4) | (tc_flow >> 4);
        let flow_label = (u32::from(tc_flow & 0xf) << 16) | u32::from(reader.read_u16_be()?);

        let payload_length = reader.read_u16_be()?;
        let next_header = reader.read_u8()?;
        let hop_limit = reader.read_u8()?;
        let source = {
            let mut value: [u8;16] = [0;16];
            reader.read_exact(&mut value)?;
            value
        };
        let destination = {
            let mut value: [u8;16] = [0;16];
            reader.read_exact(&mut value)?;
            value
        };

        //walk the extension header chain
        let mut ext_headers = Vec::new();
        let mut current = next_header;
        while is_ipv6_extension(current) {
            if ip_number::IPV6_NO_NEXT_HEADER == current {
                break;
            }
            let ext_type = reader.read_u8()?;
            let length_octets = reader.read_u8()?;
            //total on-wire length is (length_octets + 1) * 8 including the two
            //control bytes
            let data_size = (usize::from(length_octets) + 1) * 8 - 2;
            let data = {
                let mut data = vec![0u8; data_size];
                reader.read_exact(&mut data)?;
                data
            };
            ext_headers.push(Ipv6ExtHeader {
                option: ext_type,
                data
            });
            current = ext_type;
        }

        //pick the inner parser
        let rest = reader.pointer();
        let inner = if ip_number::IPV6_NO_NEXT_HEADER == current {
            Pdu::Raw(RawPdu::from_bytes(rest))
        } else {
            match pdu_for_id(current, rest).or_else(|| ipv6_ext_for_id(current, rest)) {
                Some(Ok(pdu)) => pdu,
                Some(Err(err)) => {
                    //an identified but malformed payload degrades to raw bytes
                    trace!(protocol = current, error = %err, "inner parser failed, keeping payload as raw bytes");
                    Pdu::Raw(RawPdu::from_bytes(rest))
                },
                None => Pdu::Raw(RawPdu::from_bytes(rest)),
            }
        };

        Ok(Ipv6Pdu {
            traffic_class,
            flow_label,
            payload_length,
            next_header,
            hop_limit,
            source,
            destination,
            ext_headers,
            inner: Some(Box::new(inner)),
        })
    }

    ///Read the "flow label" field.
    pub fn flow_label(&self) -> u32 {
        self.flow_label
    }

    ///Sets the "flow label" field (20 bit).
    pub fn set_flow_label(&mut self, value: u32) -> Result<(), ValueError> {
        max_check_u32(value, 0xfffff, ErrorField::Ipv6FlowLabel)?;
        self.flow_label = value;
        Ok(())
    }

    ///Sets the "hop limit" field.
    pub fn set_hop_limit(&mut self, value: u8) {
        self.hop_limit = value;
    }

    ///Return the ipv6 source address as an std::net::Ipv6Addr
    pub fn source_addr(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.source)
    }

    ///Return the ipv6 destination address as an std::net::Ipv6Addr
    pub fn destination_addr(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.destination)
    }

    ///Sets the source address.
    pub fn set_source(&mut self, addr: Ipv6Addr) {
        self.source = addr.octets();
    }

    ///Sets the destination address.
    pub fn set_destination(&mut self, addr: Ipv6Addr) {
        self.destination = addr.octets();
    }

    ///Sets the stored payload_length field based on the given payload size.
    ///Returns an error if the payload is too big to fit. Note that the field
    ///is recomputed from the actual chain size when serializing.
    pub fn set_payload_length(&mut self, size: usize) -> Result<(), ValueError> {
        const MAX_PAYLOAD_LENGTH: usize = std::u16::MAX as usize;
        if MAX_PAYLOAD_LENGTH < size {
            return Err(ValueError::Ipv6PayloadLengthTooLarge(size));
        }

        self.payload_length = size as u16;
        Ok(())
    }

    ///The parsed extension headers in wire order.
    pub fn ext_headers(&self) -> &[Ipv6ExtHeader] {
        &self.ext_headers
    }

    ///Appends an extension header of the given type.
    ///
    ///`ext_id` is written into the previously last next-header slot (so the
    ///chain stays consistent), the new header itself is terminated with
    ///`NO_NEXT_HEADER` until a later header or the inner unit overwrites it.
    ///The payload length must fulfill `(payload.len() + 2) % 8 == 0`.
    pub fn add_ext_header(&mut self, ext_id: u8, payload: Vec<u8>) -> Result<(), ValueError> {
        let header = Ipv6ExtHeader::new(ip_number::IPV6_NO_NEXT_HEADER, payload)?;
        self.set_last_next_header(ext_id);
        self.ext_headers.push(header);
        Ok(())
    }

    ///Overwrites the last next-header slot of the chain: the `option` field of
    ///the last extension header, or the `next_header` field of the fixed
    ///header if there are no extension headers.
    pub fn set_last_next_header(&mut self, value: u8) {
        match self.ext_headers.last_mut() {
            Some(last) => last.option = value,
            None => self.next_header = value,
        }
    }

    ///Reads the last next-header slot of the chain (the discriminator of the
    ///payload below all extension headers).
    pub fn last_next_header(&self) -> u8 {
        match self.ext_headers.last() {
            Some(last) => last.option,
            None => self.next_header,
        }
    }

    ///Serialized size of the fixed header plus all extension headers.
    pub fn header_size(&self) -> usize {
        IPV6_HEADER_SIZE + self.ext_headers.iter().map(|h| h.header_len()).sum::<usize>()
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
        //discriminator of the inner unit, if one is registered for its kind
        let inner_id = self.inner
            .as_ref()
            .and_then(|inner| id_for_pdu_type(inner.pdu_type()));

        let mut writer = ByteWriter::new(buffer);

        //version, traffic class & flow label
        writer.write_u8((6 << 4) | (self.traffic_class >> 4));
        writer.write_u8((self.traffic_class << 4) | ((self.flow_label >> 16) as u8 & 0xf));
        writer.write_u16_be(self.flow_label as u16);

        //payload length = everything after the fixed header
        writer.write_u16_be((total_size - IPV6_HEADER_SIZE) as u16);

        //the fixed next_header names the first extension header; only without
        //extension headers it is the slot naming the inner unit
        if self.ext_headers.is_empty() {
            writer.write_u8(inner_id.unwrap_or(self.next_header));
        } else {
            writer.write_u8(self.next_header);
        }
        writer.write_u8(self.hop_limit);
        writer.write_slice(&self.source);
        writer.write_slice(&self.destination);

        //extension headers, rewriting the last next-header slot to the inner
        //unit's discriminator
        let last = self.ext_headers.len().wrapping_sub(1);
        for (index, header) in self.ext_headers.iter().enumerate() {
            if index == last {
                writer.write_u8(inner_id.unwrap_or(header.option));
            } else {
                writer.write_u8(header.option);
            }
            writer.write_u8((header.data.len() / 8) as u8);
            writer.write_slice(&header.data);
        }
    }

    ///Checks if the given inbound packet could be the response to this unit:
    ///the addresses must be mirrored (with a relaxation for `ff02::/16`
    ///multicast destinations in the response) and the inner unit must match
    ///recursively after skipping the extension headers of the response.
    pub fn matches_response(&self, buffer: &[u8]) -> bool {
        if buffer.len() < IPV6_HEADER_SIZE {
            return false;
        }
        let response_source = &buffer[8..24];
        let response_destination = &buffer[24..40];

        if response_source != &self.destination[..] {
            return false;
        }
        //responses to multicast queries come back with our unicast address or
        //keep a link local multicast destination
        let destination_mirrored = response_destination == &self.source[..]
            || (0xff == response_destination[0] && 0x02 == response_destination[1]);
        if !destination_mirrored {
            return false;
        }

        match &self.inner {
            None => true,
            Some(inner) => {
                match skip_extension_headers(buffer) {
                    Some(payload_offset) => inner.matches_response(&buffer[payload_offset..]),
                    None => false,
                }
            }
        }
    }
}

//Returns the offset of the payload behind all extension headers of the given
//ipv6 packet, or None if an extension header overruns the buffer.
fn skip_extension_headers(buffer: &[u8]) -> Option<usize> {
    let mut current = buffer[6];
    let mut offset = IPV6_HEADER_SIZE;
    while is_ipv6_extension(current) {
        if ip_number::IPV6_NO_NEXT_HEADER == current {
            break;
        }
        if buffer.len() < offset + 2 {
            return None;
        }
        let length = (usize::from(buffer[offset + 1]) + 1) * 8;
        if buffer.len() < offset + length {
            return None;
        }
        current = buffer[offset];
        offset += length;
    }
    Some(offset)
}

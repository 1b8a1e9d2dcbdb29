use super::super::*;

extern crate byteorder;
use self::byteorder::{ByteOrder, BigEndian};

use std::net::{Ipv4Addr, Ipv6Addr};

///Size of the dns header in bytes.
pub const DNS_HEADER_SIZE: usize = 12;

//flag masks of the 16 bit dns flags field
const FLAG_QR: u16 = 1 << 15;
const FLAG_AA: u16 = 1 << 10;
const FLAG_TC: u16 = 1 << 9;
const FLAG_RD: u16 = 1 << 8;
const FLAG_RA: u16 = 1 << 7;
const FLAG_Z: u16 = 1 << 6;
const FLAG_AD: u16 = 1 << 5;
const FLAG_CD: u16 = 1 << 4;

/// Module containing the u16 constants of the dns resource record types used
/// by this library.
///
/// The values were copied from
/// <https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml>
pub mod dns_record_type {
    ///IPv4 host address \[[RFC1035](https://datatracker.ietf.org/doc/html/rfc1035)\]
    pub const A: u16 = 1;
    ///Authoritative name server \[[RFC1035](https://datatracker.ietf.org/doc/html/rfc1035)\]
    pub const NS: u16 = 2;
    ///Canonical name for an alias \[[RFC1035](https://datatracker.ietf.org/doc/html/rfc1035)\]
    pub const CNAME: u16 = 5;
    ///Marks the start of a zone of authority \[[RFC1035](https://datatracker.ietf.org/doc/html/rfc1035)\]
    pub const SOA: u16 = 6;
    ///Domain name pointer \[[RFC1035](https://datatracker.ietf.org/doc/html/rfc1035)\]
    pub const PTR: u16 = 12;
    ///Mail exchange \[[RFC1035](https://datatracker.ietf.org/doc/html/rfc1035)\]
    pub const MX: u16 = 15;
    ///Text strings \[[RFC1035](https://datatracker.ietf.org/doc/html/rfc1035)\]
    pub const TXT: u16 = 16;
    ///IPv6 host address \[[RFC3596](https://datatracker.ietf.org/doc/html/rfc3596)\]
    pub const AAAA: u16 = 28;
    ///Delegation name \[[RFC6672](https://datatracker.ietf.org/doc/html/rfc6672)\]
    pub const DNAME: u16 = 39;
    ///Request for all records the server has available \[[RFC1035](https://datatracker.ietf.org/doc/html/rfc1035)\]
    pub const ANY: u16 = 255;
}

/// Module containing the u16 constants of the dns record classes.
pub mod dns_record_class {
    ///The internet
    pub const IN: u16 = 1;
    ///The CHAOS class
    pub const CH: u16 = 3;
    ///Hesiod
    pub const HS: u16 = 4;
    ///Any class
    pub const ANY: u16 = 255;
}

///One entry of the dns question section.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DnsQuery {
    ///The queried domain name in dotted notation.
    pub dname: String,
    pub query_type: u16,
    pub query_class: u16,
}

///The decoded data of a dns resource record.
///
///A & AAAA records carry addresses, the name carrying record types (NS,
///CNAME, PTR, DNAME) a domain name, MX a preference plus the exchange name.
///Everything else is kept as opaque bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DnsRdata {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Name(String),
    Mx{ preference: u16, exchange: String },
    Raw(Vec<u8>),
}

///One entry of the dns answer, authority or additional section.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DnsResource {
    ///The domain name the record belongs to, in dotted notation.
    pub dname: String,
    pub record_type: u16,
    pub record_class: u16,
    ///Time to live of the record in seconds.
    pub ttl: u32,
    pub data: DnsRdata,
}

///DNS protocol unit: the 12 byte header plus the contiguous records data
///region holding the four sections (questions, answers, authority,
///additional) concatenated.
///
///Three offsets partition the records data: `[0, answers_idx)` holds the
///questions, `[answers_idx, authority_idx)` the answers,
///`[authority_idx, additional_idx)` the authority records and
///`[additional_idx, end)` the additional records. Every mutation keeps the
///offsets, the header counts and the compression pointers inside the region
///consistent.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DnsPdu {
    id: u16,
    flags: u16,
    questions_count: u16,
    answers_count: u16,
    authority_count: u16,
    additional_count: u16,
    records_data: Vec<u8>,
    answers_idx: usize,
    authority_idx: usize,
    additional_idx: usize,
    inner: Option<Box<Pdu>>,
}

impl Default for DnsPdu {
    fn default() -> DnsPdu {
        DnsPdu::new()
    }
}

impl DnsPdu {

    ///Creates an empty dns unit (no flags set, no records).
    pub fn new() -> DnsPdu {
        DnsPdu {
            id: 0,
            flags: 0,
            questions_count: 0,
            answers_count: 0,
            authority_count: 0,
            additional_count: 0,
            records_data: Vec::new(),
            answers_idx: 0,
            authority_idx: 0,
            additional_idx: 0,
            inner: None,
        }
    }

    ///Parses a dns unit from the given buffer.
    ///
    ///The bytes after the header are copied into the records data region and
    ///walked once (questions, answers, authority, additional as counted in the
    ///header) to establish the section offsets. Any length field overrunning
    ///the buffer fails the parse.
    pub fn from_bytes(buffer: &[u8]) -> Result<DnsPdu, ReadError> {
        let mut reader = ByteReader::new(buffer);

        let id = reader.read_u16_be()?;
        let flags = reader.read_u16_be()?;
        let questions_count = reader.read_u16_be()?;
        let answers_count = reader.read_u16_be()?;
        let authority_count = reader.read_u16_be()?;
        let additional_count = reader.read_u16_be()?;

        let mut records_data = reader.pointer().to_vec();

        //walk the sections to establish the partition offsets
        let mut offset = 0;
        for _ in 0..questions_count {
            offset = skip_question(&records_data, offset)?;
        }
        let answers_idx = offset;
        for _ in 0..answers_count {
            offset = skip_record(&records_data, offset)?;
        }
        let authority_idx = offset;
        for _ in 0..authority_count {
            offset = skip_record(&records_data, offset)?;
        }
        let additional_idx = offset;
        for _ in 0..additional_count {
            offset = skip_record(&records_data, offset)?;
        }
        //bytes past the counted records are not part of any section
        records_data.truncate(offset);

        Ok(DnsPdu {
            id,
            flags,
            questions_count,
            answers_count,
            authority_count,
            additional_count,
            records_data,
            answers_idx,
            authority_idx,
            additional_idx,
            inner: None,
        })
    }

    ///Read the "transaction id" field.
    pub fn id(&self) -> u16 {
        self.id
    }

    ///Sets the "transaction id" field.
    pub fn set_id(&mut self, value: u16) {
        self.id = value;
    }

    ///Read the "query/response" flag (false = query, true = response).
    pub fn qr(&self) -> bool {
        0 != self.flags & FLAG_QR
    }

    ///Sets the "query/response" flag.
    pub fn set_qr(&mut self, value: bool) {
        self.set_flag(FLAG_QR, value);
    }

    ///Read the "opcode" field (4 bit).
    pub fn opcode(&self) -> u8 {
        ((self.flags >> 11) & 0xf) as u8
    }

    ///Sets the "opcode" field. Values larger then 4 bit are truncated.
    pub fn set_opcode(&mut self, value: u8) {
        self.flags = (self.flags & !(0xf << 11)) | (u16::from(value & 0xf) << 11);
    }

    ///Read the "authoritative answer" flag.
    pub fn authoritative_answer(&self) -> bool {
        0 != self.flags & FLAG_AA
    }

    ///Sets the "authoritative answer" flag.
    pub fn set_authoritative_answer(&mut self, value: bool) {
        self.set_flag(FLAG_AA, value);
    }

    ///Read the "truncated" flag.
    pub fn truncated(&self) -> bool {
        0 != self.flags & FLAG_TC
    }

    ///Sets the "truncated" flag.
    pub fn set_truncated(&mut self, value: bool) {
        self.set_flag(FLAG_TC, value);
    }

    ///Read the "recursion desired" flag.
    pub fn recursion_desired(&self) -> bool {
        0 != self.flags & FLAG_RD
    }

    ///Sets the "recursion desired" flag.
    pub fn set_recursion_desired(&mut self, value: bool) {
        self.set_flag(FLAG_RD, value);
    }

    ///Read the "recursion available" flag.
    pub fn recursion_available(&self) -> bool {
        0 != self.flags & FLAG_RA
    }

    ///Sets the "recursion available" flag.
    pub fn set_recursion_available(&mut self, value: bool) {
        self.set_flag(FLAG_RA, value);
    }

    ///Read the "z" (reserved) flag.
    pub fn z(&self) -> bool {
        0 != self.flags & FLAG_Z
    }

    ///Sets the "z" (reserved) flag.
    pub fn set_z(&mut self, value: bool) {
        self.set_flag(FLAG_Z, value);
    }

    ///Read the "authenticated data" flag.
    pub fn authenticated_data(&self) -> bool {
        0 != self.flags & FLAG_AD
    }

    ///Sets the "authenticated data" flag.
    pub fn set_authenticated_data(&mut self, value: bool) {
        self.set_flag(FLAG_AD, value);
    }

    ///Read the "checking disabled" flag.
    pub fn checking_disabled(&self) -> bool {
        0 != self.flags & FLAG_CD
    }

    ///Sets the "checking disabled" flag.
    pub fn set_checking_disabled(&mut self, value: bool) {
        self.set_flag(FLAG_CD, value);
    }

    ///Read the "response code" field (4 bit).
    pub fn rcode(&self) -> u8 {
        (self.flags & 0xf) as u8
    }

    ///Sets the "response code" field. Values larger then 4 bit are truncated.
    pub fn set_rcode(&mut self, value: u8) {
        self.flags = (self.flags & !0xf) | u16::from(value & 0xf);
    }

    fn set_flag(&mut self, mask: u16, value: bool) {
        if value {
            self.flags |= mask;
        } else {
            self.flags &= !mask;
        }
    }

    ///Number of entries in the question section.
    pub fn questions_count(&self) -> u16 {
        self.questions_count
    }

    ///Number of entries in the answer section.
    pub fn answers_count(&self) -> u16 {
        self.answers_count
    }

    ///Number of entries in the authority section.
    pub fn authority_count(&self) -> u16 {
        self.authority_count
    }

    ///Number of entries in the additional section.
    pub fn additional_count(&self) -> u16 {
        self.additional_count
    }

    ///The raw records data region (all four sections concatenated).
    pub fn records_data(&self) -> &[u8] {
        &self.records_data
    }

    ///Decodes the entries of the question section.
    pub fn queries(&self) -> Result<Vec<DnsQuery>, ReadError> {
        let mut result = Vec::new();
        let mut offset = 0;
        while offset < self.answers_idx {
            let (dname, consumed) = compose_name(&self.records_data, offset)?;
            offset += consumed;
            if offset + 4 > self.records_data.len() {
                return Err(ReadError::UnexpectedEndOfSlice(DNS_HEADER_SIZE + offset + 4));
            }
            result.push(DnsQuery {
                dname,
                query_type: BigEndian::read_u16(&self.records_data[offset..offset + 2]),
                query_class: BigEndian::read_u16(&self.records_data[offset + 2..offset + 4]),
            });
            offset += 4;
        }
        Ok(result)
    }

    ///Decodes the entries of the answer section.
    pub fn answers(&self) -> Result<Vec<DnsResource>, ReadError> {
        self.resources_in(self.answers_idx, self.authority_idx)
    }

    ///Decodes the entries of the authority section.
    pub fn authority(&self) -> Result<Vec<DnsResource>, ReadError> {
        self.resources_in(self.authority_idx, self.additional_idx)
    }

    ///Decodes the entries of the additional section.
    pub fn additional(&self) -> Result<Vec<DnsResource>, ReadError> {
        self.resources_in(self.additional_idx, self.records_data.len())
    }

    fn resources_in(&self, start: usize, end: usize) -> Result<Vec<DnsResource>, ReadError> {
        let mut result = Vec::new();
        let mut offset = start;
        while offset < end {
            let (dname, consumed) = compose_name(&self.records_data, offset)?;
            offset += consumed;
            if offset + 10 > self.records_data.len() {
                return Err(ReadError::UnexpectedEndOfSlice(DNS_HEADER_SIZE + offset + 10));
            }
            let record_type = BigEndian::read_u16(&self.records_data[offset..offset + 2]);
            let record_class = BigEndian::read_u16(&self.records_data[offset + 2..offset + 4]);
            let ttl = BigEndian::read_u32(&self.records_data[offset + 4..offset + 8]);
            let rdlength = usize::from(BigEndian::read_u16(&self.records_data[offset + 8..offset + 10]));
            offset += 10;
            if offset + rdlength > self.records_data.len() {
                return Err(ReadError::UnexpectedEndOfSlice(DNS_HEADER_SIZE + offset + rdlength));
            }
            let data = self.decode_rdata(record_type, offset, rdlength)?;
            offset += rdlength;
            result.push(DnsResource {
                dname,
                record_type,
                record_class,
                ttl,
                data,
            });
        }
        Ok(result)
    }

    fn decode_rdata(&self, record_type: u16, offset: usize, rdlength: usize) -> Result<DnsRdata, ReadError> {
        use crate::dns_record_type::*;
        let raw = &self.records_data[offset..offset + rdlength];
        Ok(match record_type {
            A if 4 == rdlength => {
                let mut octets = [0u8; 4];
                octets.copy_from_slice(raw);
                DnsRdata::A(Ipv4Addr::from(octets))
            },
            AAAA if 16 == rdlength => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(raw);
                DnsRdata::Aaaa(Ipv6Addr::from(octets))
            },
            NS | CNAME | PTR | DNAME => {
                //compression pointers are relative to the whole packet, so the
                //name is decoded against the full records data region
                DnsRdata::Name(compose_name(&self.records_data, offset)?.0)
            },
            MX if rdlength >= 2 => {
                DnsRdata::Mx {
                    preference: BigEndian::read_u16(raw),
                    exchange: compose_name(&self.records_data, offset + 2)?.0,
                }
            },
            _ => DnsRdata::Raw(raw.to_vec()),
        })
    }

    ///Appends an entry to the question section.
    ///
    ///The encoded bytes are inserted at the end of the question section; the
    ///section offsets and every compression pointer pointing behind the
    ///insertion point are shifted by the inserted length.
    pub fn add_query(&mut self, query: &DnsQuery) -> Result<(), ValueError> {
        let mut bytes = encode_name(&query.dname)?;
        bytes.extend_from_slice(&query.query_type.to_be_bytes());
        bytes.extend_from_slice(&query.query_class.to_be_bytes());

        let threshold = self.answers_idx;
        let inserted = bytes.len();
        self.insert_bytes(threshold, bytes);
        self.answers_idx += inserted;
        self.authority_idx += inserted;
        self.additional_idx += inserted;
        self.shift_pointers(threshold, inserted);
        self.questions_count += 1;
        Ok(())
    }

    ///Appends a record to the answer section (see [`DnsPdu::add_query`] for
    ///the offset & pointer maintenance).
    pub fn add_answer(&mut self, resource: &DnsResource) -> Result<(), ValueError> {
        let bytes = encode_resource(resource)?;

        let threshold = self.authority_idx;
        let inserted = bytes.len();
        self.insert_bytes(threshold, bytes);
        self.authority_idx += inserted;
        self.additional_idx += inserted;
        self.shift_pointers(threshold, inserted);
        self.answers_count += 1;
        Ok(())
    }

    ///Appends a record to the authority section.
    pub fn add_authority(&mut self, resource: &DnsResource) -> Result<(), ValueError> {
        let bytes = encode_resource(resource)?;

        let threshold = self.additional_idx;
        let inserted = bytes.len();
        self.insert_bytes(threshold, bytes);
        self.additional_idx += inserted;
        self.shift_pointers(threshold, inserted);
        self.authority_count += 1;
        Ok(())
    }

    ///Appends a record to the additional section.
    pub fn add_additional(&mut self, resource: &DnsResource) -> Result<(), ValueError> {
        let bytes = encode_resource(resource)?;

        let threshold = self.records_data.len();
        let inserted = bytes.len();
        self.insert_bytes(threshold, bytes);
        self.shift_pointers(threshold, inserted);
        self.additional_count += 1;
        Ok(())
    }

    fn insert_bytes(&mut self, index: usize, bytes: Vec<u8>) {
        let tail = self.records_data.split_off(index);
        self.records_data.extend_from_slice(&bytes);
        self.records_data.extend_from_slice(&tail);
    }

    //Rewrites every compression pointer in the records data whose target index
    //lies strictly behind the insertion threshold. Pointers at or before the
    //threshold are undisturbed. The walk relies on the section structure that
    //every mutation keeps intact.
    fn shift_pointers(&mut self, threshold: usize, delta: usize) {
        use crate::dns_record_type::*;

        let mut offset = 0;
        while offset < self.answers_idx {
            offset = rewrite_pointers_in_name(&mut self.records_data, offset, threshold, delta);
            offset += 4;
        }
        let section_ends = [self.authority_idx, self.additional_idx, self.records_data.len()];
        for &end in section_ends.iter() {
            while offset < end {
                offset = rewrite_pointers_in_name(&mut self.records_data, offset, threshold, delta);
                if offset + 10 > self.records_data.len() {
                    return;
                }
                let record_type = BigEndian::read_u16(&self.records_data[offset..offset + 2]);
                let rdlength = usize::from(BigEndian::read_u16(&self.records_data[offset + 8..offset + 10]));
                let rdata_start = offset + 10;
                match record_type {
                    NS | CNAME | PTR | DNAME => {
                        rewrite_pointers_in_name(&mut self.records_data, rdata_start, threshold, delta);
                    },
                    MX if rdlength >= 2 => {
                        rewrite_pointers_in_name(&mut self.records_data, rdata_start + 2, threshold, delta);
                    },
                    _ => {}
                }
                offset = rdata_start + rdlength;
            }
        }
    }

    ///Serialized size of the unit (header plus records data).
    pub fn header_size(&self) -> usize {
        DNS_HEADER_SIZE + self.records_data.len()
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
        writer.write_u16_be(self.id);
        writer.write_u16_be(self.flags);
        writer.write_u16_be(self.questions_count);
        writer.write_u16_be(self.answers_count);
        writer.write_u16_be(self.authority_count);
        writer.write_u16_be(self.additional_count);
        writer.write_slice(&self.records_data);
    }

    ///A buffer matches as a response when the raw bytes of its transaction id
    ///field equal the own id. The QR flag is deliberately not checked; higher
    ///layers may additionally verify it.
    pub fn matches_response(&self, buffer: &[u8]) -> bool {
        buffer.len() >= DNS_HEADER_SIZE && BigEndian::read_u16(&buffer[..2]) == self.id
    }
}

///Converts a dotted domain name into its wire encoding: length prefixed
///labels followed by a terminating zero label. No compression is emitted.
pub fn encode_name(name: &str) -> Result<Vec<u8>, ValueError> {
    let mut result = Vec::with_capacity(name.len() + 2);
    for label in name.split('.') {
        //empty labels (leading/trailing/double dots) are dropped
        if label.is_empty() {
            continue;
        }
        if label.len() > 63 {
            return Err(ValueError::DnsLabelTooLong(label.len()));
        }
        result.push(label.len() as u8);
        result.extend_from_slice(label.as_bytes());
    }
    result.push(0);
    if result.len() > 255 {
        return Err(ValueError::DnsNameTooLong(result.len()));
    }
    Ok(result)
}

fn encode_resource(resource: &DnsResource) -> Result<Vec<u8>, ValueError> {
    let rdata = match &resource.data {
        DnsRdata::A(addr) => addr.octets().to_vec(),
        DnsRdata::Aaaa(addr) => addr.octets().to_vec(),
        DnsRdata::Name(name) => encode_name(name)?,
        DnsRdata::Mx{ preference, exchange } => {
            let mut bytes = preference.to_be_bytes().to_vec();
            bytes.extend_from_slice(&encode_name(exchange)?);
            bytes
        },
        DnsRdata::Raw(bytes) => bytes.clone(),
    };

    let mut result = encode_name(&resource.dname)?;
    result.extend_from_slice(&resource.record_type.to_be_bytes());
    result.extend_from_slice(&resource.record_class.to_be_bytes());
    result.extend_from_slice(&resource.ttl.to_be_bytes());
    result.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    result.extend_from_slice(&rdata);
    Ok(result)
}

///Decodes a domain name starting at `start` inside the records data,
///following length prefixed labels and compression pointers.
///
///Returns the dotted name and the number of bytes the name consumed in the
///original stream: after the first pointer the consumed count is fixed at the
///position just past that pointer, so iterators advance correctly even when
///the name jumped backwards.
pub fn compose_name(data: &[u8], start: usize) -> Result<(String, usize), ReadError> {
    let mut name = String::new();
    let mut offset = start;
    let mut stream_end = start;
    let mut jumped = false;
    let mut labels = 0;

    loop {
        //the 255 byte name bound makes this an effective loop cap already,
        //the label counter is a second bound against pointer cycles
        labels += 1;
        if labels > 128 {
            return Err(ReadError::DnsCompressionLoop);
        }
        if offset >= data.len() {
            return Err(ReadError::UnexpectedEndOfSlice(DNS_HEADER_SIZE + offset + 1));
        }
        let length = data[offset];
        if 0xc0 == length & 0xc0 {
            //a pointer ends the name in the original stream
            if offset + 2 > data.len() {
                return Err(ReadError::UnexpectedEndOfSlice(DNS_HEADER_SIZE + offset + 2));
            }
            let pointer = (u16::from(length & 0x3f) << 8) | u16::from(data[offset + 1]);
            if usize::from(pointer) < DNS_HEADER_SIZE {
                return Err(ReadError::DnsPointerOutOfRange(pointer));
            }
            //the pointer is an absolute packet offset, the header is stripped
            //from the records data
            let target = usize::from(pointer) - DNS_HEADER_SIZE;
            if target >= data.len() {
                return Err(ReadError::DnsPointerOutOfRange(pointer));
            }
            if !jumped {
                stream_end = offset + 2;
                jumped = true;
            }
            offset = target;
        } else if 0 == length {
            if !jumped {
                stream_end = offset + 1;
            }
            break;
        } else {
            let end = offset + 1 + usize::from(length);
            if end > data.len() {
                return Err(ReadError::UnexpectedEndOfSlice(DNS_HEADER_SIZE + end));
            }
            if !name.is_empty() {
                name.push('.');
            }
            name.push_str(&String::from_utf8_lossy(&data[offset + 1..end]));
            if name.len() > 255 {
                return Err(ReadError::DnsNameTooLong(name.len()));
            }
            offset = end;
        }
    }

    Ok((name, stream_end - start))
}

///Advances past a domain name without decoding it. A compression pointer ends
///the name immediately.
pub fn skip_name(data: &[u8], mut offset: usize) -> Result<usize, ReadError> {
    loop {
        if offset >= data.len() {
            return Err(ReadError::UnexpectedEndOfSlice(DNS_HEADER_SIZE + offset + 1));
        }
        let length = data[offset];
        if 0xc0 == length & 0xc0 {
            if offset + 2 > data.len() {
                return Err(ReadError::UnexpectedEndOfSlice(DNS_HEADER_SIZE + offset + 2));
            }
            return Ok(offset + 2);
        }
        if 0 == length {
            return Ok(offset + 1);
        }
        offset += 1 + usize::from(length);
    }
}

fn skip_question(data: &[u8], offset: usize) -> Result<usize, ReadError> {
    let offset = skip_name(data, offset)?;
    if offset + 4 > data.len() {
        return Err(ReadError::UnexpectedEndOfSlice(DNS_HEADER_SIZE + offset + 4));
    }
    Ok(offset + 4)
}

fn skip_record(data: &[u8], offset: usize) -> Result<usize, ReadError> {
    let offset = skip_name(data, offset)?;
    if offset + 10 > data.len() {
        return Err(ReadError::UnexpectedEndOfSlice(DNS_HEADER_SIZE + offset + 10));
    }
    let rdlength = usize::from(BigEndian::read_u16(&data[offset + 8..offset + 10]));
    let end = offset + 10 + rdlength;
    if end > data.len() {
        return Err(ReadError::UnexpectedEndOfSlice(DNS_HEADER_SIZE + end));
    }
    Ok(end)
}

//Rewrites the pointers of a single name in place and returns the offset just
//past the name. Pointer targets strictly behind the threshold are shifted by
//delta, targets at or before it stay untouched.
fn rewrite_pointers_in_name(data: &mut [u8], mut offset: usize, threshold: usize, delta: usize) -> usize {
    loop {
        if offset >= data.len() {
            return data.len();
        }
        let length = data[offset];
        if 0xc0 == length & 0xc0 {
            if offset + 2 > data.len() {
                return data.len();
            }
            let pointer = (u16::from(length & 0x3f) << 8) | u16::from(data[offset + 1]);
            let target = usize::from(pointer).saturating_sub(DNS_HEADER_SIZE);
            if target > threshold {
                let shifted = pointer + delta as u16;
                data[offset] = 0xc0 | ((shifted >> 8) as u8 & 0x3f);
                data[offset + 1] = shifted as u8;
            }
            return offset + 2;
        }
        if 0 == length {
            return offset + 1;
        }
        offset += 1 + usize::from(length);
    }
}

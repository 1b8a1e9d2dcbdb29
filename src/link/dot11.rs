use super::super::*;

extern crate byteorder;
use self::byteorder::{ByteOrder, LittleEndian};
use tracing::warn;

///Size of the 802.11 header without the optional fourth address.
pub const DOT11_HEADER_SIZE: usize = 24;

///Frame type codes of the frame control field.
pub mod frame_type {
    pub const MANAGEMENT: u8 = 0;
    pub const CONTROL: u8 = 1;
    pub const DATA: u8 = 2;
}

///Management frame subtype codes.
pub mod mgmt_subtype {
    pub const ASSOC_REQ: u8 = 0x00;
    pub const ASSOC_RESP: u8 = 0x01;
    pub const REASSOC_REQ: u8 = 0x02;
    pub const PROBE_REQ: u8 = 0x04;
    pub const PROBE_RESP: u8 = 0x05;
    pub const BEACON: u8 = 0x08;
    pub const DISASSOC: u8 = 0x0a;
    pub const AUTH: u8 = 0x0b;
    pub const DEAUTH: u8 = 0x0c;
}

///Data frame subtype codes.
pub mod data_subtype {
    pub const DATA: u8 = 0x00;
    pub const NULL_DATA: u8 = 0x04;
    pub const QOS_DATA: u8 = 0x08;
    pub const NULL_QOS_DATA: u8 = 0x0c;
}

///The 16 bit 802.11 frame control field (little endian on the wire) with
///accessors for its bit groups.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub struct FrameControl(pub u16);

impl FrameControl {

    ///Read the "protocol version" field (2 bit).
    pub fn protocol_version(&self) -> u8 {
        (self.0 & 0b11) as u8
    }

    ///Read the "type" field (2 bit).
    pub fn type_code(&self) -> u8 {
        ((self.0 >> 2) & 0b11) as u8
    }

    ///Sets the "type" field. Values larger then 2 bit are truncated.
    pub fn set_type_code(&mut self, value: u8) {
        self.0 = (self.0 & !(0b11 << 2)) | (u16::from(value & 0b11) << 2);
    }

    ///Read the "subtype" field (4 bit).
    pub fn subtype(&self) -> u8 {
        ((self.0 >> 4) & 0xf) as u8
    }

    ///Sets the "subtype" field. Values larger then 4 bit are truncated.
    pub fn set_subtype(&mut self, value: u8) {
        self.0 = (self.0 & !(0xf << 4)) | (u16::from(value & 0xf) << 4);
    }

    ///Read the "to DS" flag.
    pub fn to_ds(&self) -> bool {
        0 != self.0 & (1 << 8)
    }

    ///Sets the "to DS" flag.
    pub fn set_to_ds(&mut self, value: bool) {
        self.set_flag(1 << 8, value);
    }

    ///Read the "from DS" flag.
    pub fn from_ds(&self) -> bool {
        0 != self.0 & (1 << 9)
    }

    ///Sets the "from DS" flag.
    pub fn set_from_ds(&mut self, value: bool) {
        self.set_flag(1 << 9, value);
    }

    ///Read the "more fragments" flag.
    pub fn more_frag(&self) -> bool {
        0 != self.0 & (1 << 10)
    }

    ///Sets the "more fragments" flag.
    pub fn set_more_frag(&mut self, value: bool) {
        self.set_flag(1 << 10, value);
    }

    ///Read the "retry" flag.
    pub fn retry(&self) -> bool {
        0 != self.0 & (1 << 11)
    }

    ///Sets the "retry" flag.
    pub fn set_retry(&mut self, value: bool) {
        self.set_flag(1 << 11, value);
    }

    ///Read the "power management" flag.
    pub fn power_mgmt(&self) -> bool {
        0 != self.0 & (1 << 12)
    }

    ///Sets the "power management" flag.
    pub fn set_power_mgmt(&mut self, value: bool) {
        self.set_flag(1 << 12, value);
    }

    ///Read the "more data" flag.
    pub fn more_data(&self) -> bool {
        0 != self.0 & (1 << 13)
    }

    ///Sets the "more data" flag.
    pub fn set_more_data(&mut self, value: bool) {
        self.set_flag(1 << 13, value);
    }

    ///Read the "WEP" (protected frame) flag.
    pub fn wep(&self) -> bool {
        0 != self.0 & (1 << 14)
    }

    ///Sets the "WEP" (protected frame) flag.
    pub fn set_wep(&mut self, value: bool) {
        self.set_flag(1 << 14, value);
    }

    ///Read the "order" flag.
    pub fn order(&self) -> bool {
        0 != self.0 & (1 << 15)
    }

    ///Sets the "order" flag.
    pub fn set_order(&mut self, value: bool) {
        self.set_flag(1 << 15, value);
    }

    fn set_flag(&mut self, mask: u16, value: bool) {
        if value {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }
}

///The common 802.11 header. The fourth address is only present on the wire
///when both the to-DS & from-DS flags are set.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct Dot11Header {
    pub frame_control: FrameControl,
    pub duration_id: u16,
    pub addr1: MacAddr,
    pub addr2: MacAddr,
    pub addr3: MacAddr,
    sequence_control: u16,
    ///Fourth address, serialized only when to-DS & from-DS are both set.
    pub addr4: MacAddr,
}

impl Dot11Header {

    ///Read the "fragment number" field (4 bit) of the sequence control.
    pub fn fragment_number(&self) -> u8 {
        (self.sequence_control & 0xf) as u8
    }

    ///Sets the "fragment number" field (4 bit) of the sequence control.
    pub fn set_fragment_number(&mut self, value: u8) -> Result<(), ValueError> {
        max_check_u8(value, 0xf, ErrorField::Dot11FragmentNumber)?;
        self.sequence_control = (self.sequence_control & !0xf) | u16::from(value);
        Ok(())
    }

    ///Read the "sequence number" field (12 bit) of the sequence control.
    pub fn sequence_number(&self) -> u16 {
        self.sequence_control >> 4
    }

    ///Sets the "sequence number" field (12 bit) of the sequence control.
    pub fn set_sequence_number(&mut self, value: u16) -> Result<(), ValueError> {
        max_check_u16(value, 0xfff, ErrorField::Dot11SequenceNumber)?;
        self.sequence_control = (self.sequence_control & 0xf) | (value << 4);
        Ok(())
    }

    ///True if the optional fourth address is present (to-DS & from-DS set).
    pub fn has_addr4(&self) -> bool {
        self.frame_control.to_ds() && self.frame_control.from_ds()
    }

    ///Serialized size of the header (24 bytes, plus 6 for the fourth address).
    pub fn header_size(&self) -> usize {
        if self.has_addr4() {
            DOT11_HEADER_SIZE + 6
        } else {
            DOT11_HEADER_SIZE
        }
    }
}

///The subtype specific part of an 802.11 frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Dot11Body {
    ///A frame without an interpreted body (control frames, unknown subtypes).
    None,
    Beacon(BeaconBody),
    AssocRequest(AssocRequestBody),
    AssocResponse(AssocResponseBody),
    Disassoc(DisassocBody),
    Data,
    QosData{ qos_control: u16 },
}

///IEEE 802.11 protocol unit: common header, subtype specific body, the tagged
///parameter list of management frames and the owned inner unit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dot11Pdu {
    pub header: Dot11Header,
    body: Dot11Body,
    options: Vec<Dot11Option>,
    inner: Option<Box<Pdu>>,
}

impl Default for Dot11Pdu {
    fn default() -> Dot11Pdu {
        Dot11Pdu::new()
    }
}

impl Dot11Pdu {

    ///Creates a bare 802.11 frame without an interpreted body.
    pub fn new() -> Dot11Pdu {
        Dot11Pdu {
            header: Default::default(),
            body: Dot11Body::None,
            options: Vec::new(),
            inner: None,
        }
    }

    fn management(subtype: u8, body: Dot11Body) -> Dot11Pdu {
        let mut result = Dot11Pdu {
            header: Default::default(),
            body,
            options: Vec::new(),
            inner: None,
        };
        result.header.frame_control.set_type_code(frame_type::MANAGEMENT);
        result.header.frame_control.set_subtype(subtype);
        result
    }

    ///Creates a beacon frame with the given fixed body.
    pub fn beacon(body: BeaconBody) -> Dot11Pdu {
        Dot11Pdu::management(mgmt_subtype::BEACON, Dot11Body::Beacon(body))
    }

    ///Creates an association request frame with the given fixed body.
    pub fn assoc_request(body: AssocRequestBody) -> Dot11Pdu {
        Dot11Pdu::management(mgmt_subtype::ASSOC_REQ, Dot11Body::AssocRequest(body))
    }

    ///Creates an association response frame with the given fixed body.
    pub fn assoc_response(body: AssocResponseBody) -> Dot11Pdu {
        Dot11Pdu::management(mgmt_subtype::ASSOC_RESP, Dot11Body::AssocResponse(body))
    }

    ///Creates a disassociation frame with the given fixed body.
    pub fn disassoc(body: DisassocBody) -> Dot11Pdu {
        Dot11Pdu::management(mgmt_subtype::DISASSOC, Dot11Body::Disassoc(body))
    }

    ///Creates a data frame.
    pub fn data() -> Dot11Pdu {
        let mut result = Dot11Pdu::new();
        result.header.frame_control.set_type_code(frame_type::DATA);
        result.body = Dot11Body::Data;
        result
    }

    ///Creates a QoS data frame with the given QoS control word.
    pub fn qos_data(qos_control: u16) -> Dot11Pdu {
        let mut result = Dot11Pdu::new();
        result.header.frame_control.set_type_code(frame_type::DATA);
        result.header.frame_control.set_subtype(data_subtype::QOS_DATA);
        result.body = Dot11Body::QosData{ qos_control };
        result
    }

    ///Parses an 802.11 frame from the given buffer.
    ///
    ///At least the 2 byte frame control field must be present; a buffer
    ///shorter then the full header produces a frame with the missing header
    ///fields zeroed. The frame type & subtype select the body decoder:
    ///management frames get their fixed body plus the tagged parameter list,
    ///data frames (subtype < 4 and QoS data) wrap the remainder as
    ///[`SnapPdu`], everything else keeps the remainder as [`RawPdu`].
    pub fn from_bytes(buffer: &[u8]) -> Result<Dot11Pdu, ReadError> {
        if buffer.len() < 2 {
            return Err(ReadError::UnexpectedEndOfSlice(2));
        }
        let frame_control = FrameControl(LittleEndian::read_u16(&buffer[..2]));

        //copy whatever part of the header is present, missing fields stay zero
        let full_header_size = if frame_control.to_ds() && frame_control.from_ds() {
            DOT11_HEADER_SIZE + 6
        } else {
            DOT11_HEADER_SIZE
        };
        let mut scratch = [0u8; DOT11_HEADER_SIZE + 6];
        let present = std::cmp::min(buffer.len(), full_header_size);
        scratch[..present].copy_from_slice(&buffer[..present]);

        let header = Dot11Header {
            frame_control,
            duration_id: LittleEndian::read_u16(&scratch[2..4]),
            addr1: MacAddr([scratch[4], scratch[5], scratch[6], scratch[7], scratch[8], scratch[9]]),
            addr2: MacAddr([scratch[10], scratch[11], scratch[12], scratch[13], scratch[14], scratch[15]]),
            addr3: MacAddr([scratch[16], scratch[17], scratch[18], scratch[19], scratch[20], scratch[21]]),
            sequence_control: LittleEndian::read_u16(&scratch[22..24]),
            addr4: MacAddr([scratch[24], scratch[25], scratch[26], scratch[27], scratch[28], scratch[29]]),
        };
        let rest = &buffer[present..];

        let mut result = Dot11Pdu {
            header,
            body: Dot11Body::None,
            options: Vec::new(),
            inner: None,
        };

        match (frame_control.type_code(), frame_control.subtype()) {
            (frame_type::MANAGEMENT, mgmt_subtype::BEACON) => {
                let mut reader = ByteReader::new(rest);
                result.body = Dot11Body::Beacon(BeaconBody {
                    timestamp: reader.read_u64_le()?,
                    interval: reader.read_u16_le()?,
                    capability: reader.read_u16_le()?,
                });
                result.options = parse_options(reader.pointer());
            },
            (frame_type::MANAGEMENT, mgmt_subtype::ASSOC_REQ) => {
                let mut reader = ByteReader::new(rest);
                result.body = Dot11Body::AssocRequest(AssocRequestBody {
                    capability: reader.read_u16_le()?,
                    listen_interval: reader.read_u16_le()?,
                });
                result.options = parse_options(reader.pointer());
            },
            (frame_type::MANAGEMENT, mgmt_subtype::ASSOC_RESP) => {
                let mut reader = ByteReader::new(rest);
                result.body = Dot11Body::AssocResponse(AssocResponseBody {
                    capability: reader.read_u16_le()?,
                    status_code: reader.read_u16_le()?,
                    association_id: reader.read_u16_le()?,
                });
                result.options = parse_options(reader.pointer());
            },
            (frame_type::MANAGEMENT, mgmt_subtype::DISASSOC) => {
                let mut reader = ByteReader::new(rest);
                result.body = Dot11Body::Disassoc(DisassocBody {
                    reason_code: reader.read_u16_le()?,
                });
                result.options = parse_options(reader.pointer());
            },
            (frame_type::DATA, subtype) if subtype < 4 => {
                result.body = Dot11Body::Data;
                result.inner = Some(Box::new(parse_snap_payload(rest)?));
            },
            (frame_type::DATA, subtype) if data_subtype::QOS_DATA == subtype => {
                let mut reader = ByteReader::new(rest);
                result.body = Dot11Body::QosData {
                    qos_control: reader.read_u16_le()?,
                };
                result.inner = Some(Box::new(parse_snap_payload(reader.pointer())?));
            },
            _ => {
                //control frames & unknown subtypes stay a generic frame
                if !rest.is_empty() {
                    result.inner = Some(Box::new(Pdu::Raw(RawPdu::from_bytes(rest))));
                }
            }
        }
        Ok(result)
    }

    ///The subtype specific body of the frame.
    pub fn body(&self) -> &Dot11Body {
        &self.body
    }

    ///Mutable access to the subtype specific body of the frame.
    pub fn body_mut(&mut self) -> &mut Dot11Body {
        &mut self.body
    }

    ///The tagged parameters of the frame in wire order.
    pub fn options(&self) -> &[Dot11Option] {
        &self.options
    }

    ///Appends a tagged parameter.
    pub fn add_option(&mut self, option: Dot11Option) {
        self.options.push(option);
    }

    ///Returns the first tagged parameter with the given tag.
    pub fn search_option(&self, tag: u8) -> Option<&Dot11Option> {
        self.options.iter().find(|option| option.tag == tag)
    }

    ///Returns the network name carried in the SSID tagged parameter.
    pub fn essid(&self) -> Option<String> {
        self.search_option(option_tag::SSID)
            .map(|option| String::from_utf8_lossy(&option.value).into_owned())
    }

    ///Sets the SSID tagged parameter (appends it if not present).
    pub fn set_essid(&mut self, essid: &str) {
        match self.options.iter_mut().find(|option| option.tag == option_tag::SSID) {
            Some(option) => option.value = essid.as_bytes().to_vec(),
            None => self.options.push(Dot11Option {
                tag: option_tag::SSID,
                value: essid.as_bytes().to_vec(),
            }),
        }
    }

    ///Decodes the supported-rates tagged parameter into rates in Mbit/s with
    ///the basic-rate marker bit stripped.
    pub fn supported_rates(&self) -> Option<Vec<f32>> {
        self.search_option(option_tag::SUPPORTED_RATES)
            .map(|option| deserialize_rates(&option.value))
    }

    ///Sets the supported-rates tagged parameter from rates in Mbit/s
    ///(appends it if not present).
    pub fn set_supported_rates(&mut self, rates: &[f32]) {
        let value = serialize_rates(rates);
        match self.options.iter_mut().find(|option| option.tag == option_tag::SUPPORTED_RATES) {
            Some(option) => option.value = value,
            None => self.options.push(Dot11Option {
                tag: option_tag::SUPPORTED_RATES,
                value,
            }),
        }
    }

    ///Decodes the RSN information tagged parameter if present.
    pub fn rsn_information(&self) -> Option<Result<RsnInformation, ReadError>> {
        self.search_option(option_tag::RSN)
            .map(|option| RsnInformation::from_bytes(&option.value))
    }

    ///Sets the RSN information tagged parameter (appends it if not present).
    pub fn set_rsn_information(&mut self, rsn: &RsnInformation) {
        let value = rsn.serialize();
        match self.options.iter_mut().find(|option| option.tag == option_tag::RSN) {
            Some(option) => option.value = value,
            None => self.options.push(Dot11Option {
                tag: option_tag::RSN,
                value,
            }),
        }
    }

    ///The tagged identity of this frame (per subtype for the decoded bodies).
    pub fn pdu_type(&self) -> PduType {
        match self.body {
            Dot11Body::None => PduType::Dot11,
            Dot11Body::Beacon(_) => PduType::Dot11Beacon,
            Dot11Body::AssocRequest(_) => PduType::Dot11AssocReq,
            Dot11Body::AssocResponse(_) => PduType::Dot11AssocResp,
            Dot11Body::Disassoc(_) => PduType::Dot11Disassoc,
            Dot11Body::Data => PduType::Dot11Data,
            Dot11Body::QosData{ .. } => PduType::Dot11QosData,
        }
    }

    fn body_size(&self) -> usize {
        match self.body {
            Dot11Body::None => 0,
            Dot11Body::Beacon(_) => 12,
            Dot11Body::AssocRequest(_) => 4,
            Dot11Body::AssocResponse(_) => 6,
            Dot11Body::Disassoc(_) => 2,
            Dot11Body::Data => 0,
            Dot11Body::QosData{ .. } => 2,
        }
    }

    ///Serialized size: header, fixed body & tagged parameters.
    pub fn header_size(&self) -> usize {
        self.header.header_size()
            + self.body_size()
            + self.options.iter().map(|option| 2 + option.value.len()).sum::<usize>()
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
        writer.write_u16_le(self.header.frame_control.0);
        writer.write_u16_le(self.header.duration_id);
        writer.write_slice(self.header.addr1.as_bytes());
        writer.write_slice(self.header.addr2.as_bytes());
        writer.write_slice(self.header.addr3.as_bytes());
        writer.write_u16_le(self.header.sequence_control);
        if self.header.has_addr4() {
            writer.write_slice(self.header.addr4.as_bytes());
        }
        match &self.body {
            Dot11Body::None | Dot11Body::Data => {},
            Dot11Body::Beacon(body) => {
                writer.write_u64_le(body.timestamp);
                writer.write_u16_le(body.interval);
                writer.write_u16_le(body.capability);
            },
            Dot11Body::AssocRequest(body) => {
                writer.write_u16_le(body.capability);
                writer.write_u16_le(body.listen_interval);
            },
            Dot11Body::AssocResponse(body) => {
                writer.write_u16_le(body.capability);
                writer.write_u16_le(body.status_code);
                writer.write_u16_le(body.association_id);
            },
            Dot11Body::Disassoc(body) => {
                writer.write_u16_le(body.reason_code);
            },
            Dot11Body::QosData{ qos_control } => {
                writer.write_u16_le(*qos_control);
            },
        }
        for option in &self.options {
            writer.write_u8(option.tag);
            writer.write_u8(option.value.len() as u8);
            writer.write_slice(&option.value);
        }
    }

    ///A buffer matches as a response when the first two addresses are
    ///mirrored. The payload is not inspected.
    pub fn matches_response(&self, buffer: &[u8]) -> bool {
        if buffer.len() < 16 {
            return false;
        }
        buffer[4..10] == self.header.addr2.as_bytes()[..]
            && buffer[10..16] == self.header.addr1.as_bytes()[..]
    }
}

//Data frame payloads are SNAP encapsulated; an empty remainder stays an empty
//raw unit and a malformed SNAP header degrades to raw bytes.
fn parse_snap_payload(rest: &[u8]) -> Result<Pdu, ReadError> {
    if rest.is_empty() {
        return Ok(Pdu::Raw(RawPdu::new(Vec::new())));
    }
    match SnapPdu::from_bytes(rest) {
        Ok(snap) => Ok(Pdu::Snap(snap)),
        Err(_) => Ok(Pdu::Raw(RawPdu::from_bytes(rest))),
    }
}

///One tagged parameter of a management frame: tag, length & value bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dot11Option {
    pub tag: u8,
    pub value: Vec<u8>,
}

///Tag numbers of the tagged parameters used by this library.
pub mod option_tag {
    pub const SSID: u8 = 0;
    pub const SUPPORTED_RATES: u8 = 1;
    pub const DS_SET: u8 = 3;
    pub const TIM: u8 = 5;
    pub const COUNTRY: u8 = 7;
    pub const RSN: u8 = 48;
    pub const EXTENDED_SUPPORTED_RATES: u8 = 50;
    pub const VENDOR_SPECIFIC: u8 = 221;
}

//Greedy tagged parameter decode: a declared length overrunning the buffer
//ends the list without failing the parse (malformed capture tails).
pub(crate) fn parse_options(buffer: &[u8]) -> Vec<Dot11Option> {
    let mut options = Vec::new();
    let mut offset = 0;
    while offset + 2 <= buffer.len() {
        let tag = buffer[offset];
        let length = usize::from(buffer[offset + 1]);
        if offset + 2 + length > buffer.len() {
            warn!(tag, length, remaining = buffer.len() - offset - 2, "tagged parameter overruns the buffer, ignoring the tail");
            break;
        }
        options.push(Dot11Option {
            tag,
            value: buffer[offset + 2..offset + 2 + length].to_vec(),
        });
        offset += 2 + length;
    }
    options
}

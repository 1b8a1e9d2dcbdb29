use super::*;

use std::ops;

///The tagged identity of a protocol unit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PduType {
    Raw,
    Ipv6,
    Tcp,
    Udp,
    Dns,
    Dot11,
    Dot11Beacon,
    Dot11AssocReq,
    Dot11AssocResp,
    Dot11Disassoc,
    Dot11Data,
    Dot11QosData,
    Snap,
}

///One layer of a stacked packet.
///
///A `Pdu` is a node in a singly linked chain: each unit owns its header fields
///plus an optional inner unit (the next layer). The chain is built either by a
///parser (`<Unit>::from_bytes`) or by hand via [`Pdu::set_inner`] or the `/`
///operator, and turned back into wire bytes with [`Pdu::serialize`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Pdu {
    Ipv6(Ipv6Pdu),
    Tcp(TcpPdu),
    Udp(UdpPdu),
    Dns(DnsPdu),
    Dot11(Dot11Pdu),
    Snap(SnapPdu),
    Raw(RawPdu),
}

impl Pdu {

    ///Returns the tagged identity of this unit.
    pub fn pdu_type(&self) -> PduType {
        use crate::Pdu::*;
        match self {
            Ipv6(_) => PduType::Ipv6,
            Tcp(_) => PduType::Tcp,
            Udp(_) => PduType::Udp,
            Dns(_) => PduType::Dns,
            Dot11(pdu) => pdu.pdu_type(),
            Snap(_) => PduType::Snap,
            Raw(_) => PduType::Raw,
        }
    }

    ///Number of bytes this unit contributes to the serialization, excluding
    ///the inner units.
    pub fn header_size(&self) -> usize {
        use crate::Pdu::*;
        match self {
            Ipv6(pdu) => pdu.header_size(),
            Tcp(pdu) => pdu.header_size(),
            Udp(pdu) => pdu.header_size(),
            Dns(pdu) => pdu.header_size(),
            Dot11(pdu) => pdu.header_size(),
            Snap(pdu) => pdu.header_size(),
            Raw(pdu) => pdu.header_size(),
        }
    }

    ///Total number of bytes the whole chain serializes to.
    pub fn size(&self) -> usize {
        self.header_size() + match self.inner() {
            Some(inner) => inner.size(),
            None => 0
        }
    }

    ///Returns a reference to the owned inner unit (the next layer).
    pub fn inner(&self) -> Option<&Pdu> {
        use crate::Pdu::*;
        match self {
            Ipv6(pdu) => pdu.inner(),
            Tcp(pdu) => pdu.inner(),
            Udp(pdu) => pdu.inner(),
            Dns(pdu) => pdu.inner(),
            Dot11(pdu) => pdu.inner(),
            Snap(pdu) => pdu.inner(),
            Raw(_) => None,
        }
    }

    ///Returns a mutable reference to the owned inner unit.
    pub fn inner_mut(&mut self) -> Option<&mut Pdu> {
        use crate::Pdu::*;
        match self {
            Ipv6(pdu) => pdu.inner_mut(),
            Tcp(pdu) => pdu.inner_mut(),
            Udp(pdu) => pdu.inner_mut(),
            Dns(pdu) => pdu.inner_mut(),
            Dot11(pdu) => pdu.inner_mut(),
            Snap(pdu) => pdu.inner_mut(),
            Raw(_) => None,
        }
    }

    ///Replaces the owned inner unit, dropping the previous one.
    ///
    ///A [`RawPdu`] is always the end of a chain and can not own an inner unit;
    ///setting one on it has no effect.
    pub fn set_inner(&mut self, inner: Pdu) {
        use crate::Pdu::*;
        match self {
            Ipv6(pdu) => pdu.set_inner(inner),
            Tcp(pdu) => pdu.set_inner(inner),
            Udp(pdu) => pdu.set_inner(inner),
            Dns(pdu) => pdu.set_inner(inner),
            Dot11(pdu) => pdu.set_inner(inner),
            Snap(pdu) => pdu.set_inner(inner),
            Raw(_) => {}
        }
    }

    ///Removes and returns the owned inner unit.
    pub fn take_inner(&mut self) -> Option<Pdu> {
        use crate::Pdu::*;
        match self {
            Ipv6(pdu) => pdu.take_inner(),
            Tcp(pdu) => pdu.take_inner(),
            Udp(pdu) => pdu.take_inner(),
            Dns(pdu) => pdu.take_inner(),
            Dot11(pdu) => pdu.take_inner(),
            Snap(pdu) => pdu.take_inner(),
            Raw(_) => None,
        }
    }

    ///Decides whether an inbound packet starting at this layer could be the
    ///response to this unit.
    pub fn matches_response(&self, buffer: &[u8]) -> bool {
        use crate::Pdu::*;
        match self {
            Ipv6(pdu) => pdu.matches_response(buffer),
            Tcp(pdu) => pdu.matches_response(buffer),
            Udp(pdu) => pdu.matches_response(buffer),
            Dns(pdu) => pdu.matches_response(buffer),
            Dot11(pdu) => pdu.matches_response(buffer),
            Snap(pdu) => pdu.matches_response(buffer),
            Raw(pdu) => pdu.matches_response(buffer),
        }
    }

    ///Serializes the whole chain into a freshly allocated buffer.
    ///
    ///Self referential fields (payload lengths, the next header chain,
    ///checksums) are computed while writing; the stored fields of the units
    ///are left untouched.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; self.size()];
        self.serialize_into(&mut buffer, None);
        buffer
    }

    ///Writes this unit into `buffer[..header_size()]` and the inner chain
    ///into the rest of the buffer.
    ///
    ///`buffer` must span the serialization of this unit and everything below
    ///it (`self.size()` bytes); the caller is expected to size it via
    ///[`Pdu::size`] / [`Pdu::header_size`]. `parent` gives units access to the
    ///layer above for pseudo header computations and is only valid for the
    ///duration of the call.
    pub fn serialize_into(&self, buffer: &mut [u8], parent: Option<&Pdu>) {
        let header_size = self.header_size();
        let total_size = buffer.len();
        {
            use crate::Pdu::*;
            let header = &mut buffer[..header_size];
            match self {
                Ipv6(pdu) => pdu.write_header(header, total_size),
                Tcp(pdu) => pdu.write_header(header),
                Udp(pdu) => pdu.write_header(header, total_size),
                Dns(pdu) => pdu.write_header(header),
                Dot11(pdu) => pdu.write_header(header),
                Snap(pdu) => pdu.write_header(header),
                Raw(pdu) => pdu.write_header(header),
            }
        }
        if let Some(inner) = self.inner() {
            inner.serialize_into(&mut buffer[header_size..], Some(self));
        }
        // transport checksums cover the payload & the parent pseudo header,
        // so they can only be patched in after the inner chain was written
        match self {
            Pdu::Tcp(pdu) => pdu.patch_checksum(buffer, parent),
            Pdu::Udp(pdu) => pdu.patch_checksum(buffer, parent),
            _ => {}
        }
    }
}

///`outer / inner` appends `inner` at the innermost position of the `outer`
///chain and returns the combined chain (the stacking operator).
impl ops::Div for Pdu {
    type Output = Pdu;

    fn div(mut self, rhs: Pdu) -> Pdu {
        let mut cursor = &mut self;
        while cursor.inner().is_some() {
            //the loop condition guarantees an inner unit is present
            cursor = cursor.inner_mut().unwrap();
        }
        cursor.set_inner(rhs);
        self
    }
}

///Opaque payload bytes: the fallback unit used when no parser can be picked
///for a payload. Always the end of a chain (owns no inner unit).
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct RawPdu {
    payload: Vec<u8>,
}

impl RawPdu {

    ///Creates a raw unit owning the given payload bytes.
    pub fn new(payload: Vec<u8>) -> RawPdu {
        RawPdu {
            payload
        }
    }

    ///Creates a raw unit with a copy of the given bytes.
    pub fn from_bytes(buffer: &[u8]) -> RawPdu {
        RawPdu {
            payload: buffer.to_vec()
        }
    }

    ///The payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    ///Mutable access to the payload bytes.
    pub fn payload_mut(&mut self) -> &mut Vec<u8> {
        &mut self.payload
    }

    ///Serialized size (the payload length).
    pub fn header_size(&self) -> usize {
        self.payload.len()
    }

    pub(crate) fn write_header(&self, buffer: &mut [u8]) {
        buffer.copy_from_slice(&self.payload);
    }

    ///A buffer matches when it starts with the same payload bytes.
    pub fn matches_response(&self, buffer: &[u8]) -> bool {
        buffer.len() >= self.payload.len() && buffer[..self.payload.len()] == self.payload[..]
    }
}

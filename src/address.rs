use std::fmt;
use std::str::FromStr;

///A 48 bit IEEE 802 MAC address.
///
///Offers round trips between the raw 6 byte form and the usual colon
///separated hex notation:
///
///```
///# use wirecraft::MacAddr;
///let addr: MacAddr = "00:1b:44:11:3a:b7".parse().unwrap();
///assert_eq!(addr.as_bytes(), &[0x00, 0x1b, 0x44, 0x11, 0x3a, 0xb7]);
///assert_eq!("00:1b:44:11:3a:b7", addr.to_string());
///```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {

    ///The broadcast address ff:ff:ff:ff:ff:ff.
    pub const BROADCAST: MacAddr = MacAddr([0xff; 6]);

    ///Returns the raw bytes of the address.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    ///Returns true if this is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == MacAddr::BROADCAST
    }

    ///Returns true if the group bit (least significant bit of the first
    ///octet) is set.
    pub fn is_multicast(&self) -> bool {
        0 != self.0[0] & 0x01
    }

    ///Returns true if this is a unicast address (group bit not set).
    pub fn is_unicast(&self) -> bool {
        !self.is_multicast()
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(value: [u8; 6]) -> MacAddr {
        MacAddr(value)
    }
}

impl From<MacAddr> for [u8; 6] {
    fn from(value: MacAddr) -> [u8; 6] {
        value.0
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5])
    }
}

///Error when parsing the textual form of a [`MacAddr`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MacAddrParseError;

impl fmt::Display for MacAddrParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddrParseError: Expected 6 colon separated hex octets (e.g. '00:1b:44:11:3a:b7').")
    }
}

impl std::error::Error for MacAddrParseError {}

impl FromStr for MacAddr {
    type Err = MacAddrParseError;

    fn from_str(value: &str) -> Result<MacAddr, MacAddrParseError> {
        let mut result = [0u8; 6];
        let mut parts = value.split(':');
        for byte in result.iter_mut() {
            let part = parts.next().ok_or(MacAddrParseError)?;
            if part.len() != 2 {
                return Err(MacAddrParseError);
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| MacAddrParseError)?;
        }
        if parts.next().is_some() {
            return Err(MacAddrParseError);
        }
        Ok(MacAddr(result))
    }
}

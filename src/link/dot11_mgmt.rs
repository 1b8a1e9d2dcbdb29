use super::super::*;

///Fixed body of a beacon frame (12 bytes).
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct BeaconBody {
    ///Value of the timing synchronization function of the sender.
    pub timestamp: u64,
    ///Beacon interval in time units of 1024 microseconds.
    pub interval: u16,
    ///Capability information bitfield.
    pub capability: u16,
}

///Fixed body of an association request frame.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct AssocRequestBody {
    ///Capability information bitfield.
    pub capability: u16,
    ///Number of beacon intervals the station may be asleep between listening.
    pub listen_interval: u16,
}

///Fixed body of an association response frame.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct AssocResponseBody {
    ///Capability information bitfield.
    pub capability: u16,
    pub status_code: u16,
    pub association_id: u16,
}

///Fixed body of a disassociation frame.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct DisassocBody {
    pub reason_code: u16,
}

///Encodes rates given in Mbit/s into the supported-rates wire format: units
///of 500 kbit/s rounded up, with the high bit marking the 802.11b basic rates
///(1, 2, 5.5 & 11 Mbit/s).
pub fn serialize_rates(rates: &[f32]) -> Vec<u8> {
    rates.iter().map(|rate| {
        let mut value = (rate * 2.0).ceil() as u8;
        match value {
            2 | 4 | 11 | 22 => value |= 0x80,
            _ => {}
        }
        value
    }).collect()
}

///Decodes supported-rates wire bytes into rates in Mbit/s, stripping the
///basic rate marker bit.
pub fn deserialize_rates(data: &[u8]) -> Vec<f32> {
    data.iter().map(|value| f32::from(value & 0x7f) / 2.0).collect()
}

/// Module containing the u32 constants of the RSN cypher suite selectors
/// (00-0F-AC OUI plus suite type, read little endian from the wire).
pub mod rsn_cypher_suite {
    pub const WEP_40: u32 = 0x01ac0f00;
    pub const TKIP: u32 = 0x02ac0f00;
    pub const CCMP: u32 = 0x04ac0f00;
    pub const WEP_104: u32 = 0x05ac0f00;
}

/// Module containing the u32 constants of the RSN authentication & key
/// management suite selectors.
pub mod rsn_akm_suite {
    ///802.1X / EAP authentication.
    pub const EAP: u32 = 0x01ac0f00;
    ///Pre-shared key authentication.
    pub const PSK: u32 = 0x02ac0f00;
}

///Decoded RSN information element (tag 48). All multi byte fields are little
///endian on the wire.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RsnInformation {
    pub version: u16,
    pub group_suite: u32,
    pub pairwise_cyphers: Vec<u32>,
    pub akm_suites: Vec<u32>,
    pub capabilities: u16,
}

impl RsnInformation {

    ///Creates an RSN information element describing a WPA2-PSK network
    ///(CCMP group & pairwise cypher, PSK key management).
    pub fn wpa2_psk() -> RsnInformation {
        RsnInformation {
            version: 1,
            group_suite: rsn_cypher_suite::CCMP,
            pairwise_cyphers: vec![rsn_cypher_suite::CCMP],
            akm_suites: vec![rsn_akm_suite::PSK],
            capabilities: 0,
        }
    }

    ///Decodes an RSN information element from the value bytes of its tagged
    ///parameter. Any suite count inconsistent with the element length fails
    ///with [`ReadError::Dot11RsnInvalidLength`].
    pub fn from_bytes(buffer: &[u8]) -> Result<RsnInformation, ReadError> {
        let invalid = || ReadError::Dot11RsnInvalidLength(buffer.len());
        let mut reader = ByteReader::new(buffer);

        let version = reader.read_u16_le().map_err(|_| invalid())?;
        let group_suite = reader.read_u32_le().map_err(|_| invalid())?;

        let pairwise_count = reader.read_u16_le().map_err(|_| invalid())?;
        let mut pairwise_cyphers = Vec::with_capacity(usize::from(pairwise_count));
        for _ in 0..pairwise_count {
            pairwise_cyphers.push(reader.read_u32_le().map_err(|_| invalid())?);
        }

        let akm_count = reader.read_u16_le().map_err(|_| invalid())?;
        let mut akm_suites = Vec::with_capacity(usize::from(akm_count));
        for _ in 0..akm_count {
            akm_suites.push(reader.read_u32_le().map_err(|_| invalid())?);
        }

        let capabilities = reader.read_u16_le().map_err(|_| invalid())?;

        Ok(RsnInformation {
            version,
            group_suite,
            pairwise_cyphers,
            akm_suites,
            capabilities,
        })
    }

    ///Encodes the element into the value bytes of its tagged parameter.
    pub fn serialize(&self) -> Vec<u8> {
        let mut result = vec![0u8; self.serialized_size()];
        {
            let mut writer = ByteWriter::new(&mut result);
            writer.write_u16_le(self.version);
            writer.write_u32_le(self.group_suite);
            writer.write_u16_le(self.pairwise_cyphers.len() as u16);
            for suite in &self.pairwise_cyphers {
                writer.write_u32_le(*suite);
            }
            writer.write_u16_le(self.akm_suites.len() as u16);
            for suite in &self.akm_suites {
                writer.write_u32_le(*suite);
            }
            writer.write_u16_le(self.capabilities);
        }
        result
    }

    fn serialized_size(&self) -> usize {
        2 + 4 + 2 + 4*self.pairwise_cyphers.len() + 2 + 4*self.akm_suites.len() + 2
    }
}

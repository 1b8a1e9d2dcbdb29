pub mod tcp;
pub mod udp;

extern crate byteorder;
use self::byteorder::{ByteOrder, BigEndian};

///Sum of the IPv6 pseudo header (source & destination address, upper layer
///packet length and protocol number) used by the transport checksums.
pub(crate) fn ipv6_pseudo_header_sum(source: &[u8;16], destination: &[u8;16], protocol: u8, length: usize) -> u64 {
    fn address_sum(value: &[u8;16]) -> u64 {
        let mut result = 0;
        for i in 0..8 {
            let index = i*2;
            result += u64::from( BigEndian::read_u16(&value[index..(index + 2)]) );
        }
        result
    }
    address_sum(source) +
    address_sum(destination) +
    (length as u64) +
    u64::from(protocol)
}

///Takes the sum of the pseudo header and calculates the ones complement
///checksum over the given data. The two bytes at `checksum_offset` are
///treated as zero (the yet unwritten checksum field itself).
pub(crate) fn ones_complement_checksum(pseudo_header_sum: u64, data: &[u8], checksum_offset: usize) -> u16 {
    let mut sum = pseudo_header_sum;

    for i in 0..(data.len()/2) {
        let index = i*2;
        if index == checksum_offset {
            continue;
        }
        sum += u64::from( BigEndian::read_u16(&data[index..index + 2]) );
    }
    //pad the last byte with 0
    if data.len() % 2 == 1 {
        sum += u64::from( BigEndian::read_u16(&[data[data.len() - 1], 0]) );
    }

    let carry_add = (sum & 0xffff) +
                    ((sum >> 16) & 0xffff) +
                    ((sum >> 32) & 0xffff) +
                    ((sum >> 48) & 0xffff);
    let result = ((carry_add & 0xffff) + (carry_add >> 16)) as u16;
    !result
}

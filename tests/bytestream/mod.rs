use wirecraft::*;

#[test]
fn reader_reads_in_both_byte_orders() {
    let data = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0, 0x01, 0x02, 0x03, 0x04];
    let mut reader = ByteReader::new(&data);

    assert_eq!(0x1234, reader.read_u16_be().unwrap());
    assert_eq!(0x7856, reader.read_u16_le().unwrap());
    assert_eq!(0x9abcdef0, reader.read_u32_be().unwrap());
    assert_eq!(0x04030201, reader.read_u32_le().unwrap());
    assert_eq!(0, reader.remaining());
}

#[test]
fn reader_reads_64_bit_values() {
    let data = [1, 0, 0, 0, 0, 0, 0, 0];
    assert_eq!(1, ByteReader::new(&data).read_u64_le().unwrap());
    assert_eq!(0x0100_0000_0000_0000, ByteReader::new(&data).read_u64_be().unwrap());
}

#[test]
fn reader_tracks_position_and_remaining() {
    let data = [1u8, 2, 3, 4, 5];
    let mut reader = ByteReader::new(&data);

    assert_eq!(0, reader.position());
    assert_eq!(5, reader.remaining());
    assert!(reader.can_read(5));
    assert!(!reader.can_read(6));

    reader.skip(2).unwrap();
    assert_eq!(2, reader.position());
    assert_eq!(&data[2..], reader.pointer());

    assert_eq!(&[3u8, 4][..], reader.read_slice(2).unwrap());

    let mut target = [0u8; 1];
    reader.read_exact(&mut target).unwrap();
    assert_eq!([5], target);
    assert_eq!(0, reader.remaining());
}

#[test]
fn reader_signals_truncation_with_the_required_size() {
    let data = [1u8, 2];
    let mut reader = ByteReader::new(&data);

    assert_matches!(reader.read_u32_be(), Err(ReadError::UnexpectedEndOfSlice(4)));
    //a failed read does not advance the position
    assert_eq!(0x0102, reader.read_u16_be().unwrap());
    assert_matches!(reader.read_u16_be(), Err(ReadError::UnexpectedEndOfSlice(4)));
    assert_matches!(reader.skip(1), Err(ReadError::UnexpectedEndOfSlice(3)));
    assert_matches!(ByteReader::new(&data).read_slice(3), Err(ReadError::UnexpectedEndOfSlice(3)));
}

#[test]
fn writer_mirrors_the_reader() {
    let mut buffer = [0u8; 15];
    {
        let mut writer = ByteWriter::new(&mut buffer);
        writer.write_u8(0xab);
        writer.write_u16_be(0x1234);
        writer.write_u16_le(0x5678);
        writer.write_u32_be(0x9abcdef0);
        writer.write_u32_le(0x9abcdef0);
        writer.write_slice(&[0xfe, 0xff]);
        assert_eq!(15, writer.position());
    }
    assert_eq!(
        [0xab, 0x12, 0x34, 0x78, 0x56, 0x9a, 0xbc, 0xde, 0xf0, 0xf0, 0xde, 0xbc, 0x9a, 0xfe, 0xff],
        buffer
    );

    //what the writer produced reads back identically
    let mut reader = ByteReader::new(&buffer);
    assert_eq!(0xab, reader.read_u8().unwrap());
    assert_eq!(0x1234, reader.read_u16_be().unwrap());
    assert_eq!(0x5678, reader.read_u16_le().unwrap());
    assert_eq!(0x9abcdef0, reader.read_u32_be().unwrap());
    assert_eq!(0x9abcdef0, reader.read_u32_le().unwrap());
}

#[test]
fn writer_writes_64_bit_values() {
    let mut buffer = [0u8; 8];
    {
        let mut writer = ByteWriter::new(&mut buffer);
        writer.write_u64_le(0x0102_0304_0506_0708);
    }
    assert_eq!([8, 7, 6, 5, 4, 3, 2, 1], buffer);
    assert_eq!(0x0102_0304_0506_0708, ByteReader::new(&buffer).read_u64_le().unwrap());
}

use wirecraft::*;

fn ipv6_loopback_bytes() -> Vec<u8> {
    let mut buffer = vec![0x60, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3b, 0x40];
    let mut localhost = [0u8; 16];
    localhost[15] = 1;
    buffer.extend_from_slice(&localhost);
    buffer.extend_from_slice(&localhost);
    buffer
}

#[test]
fn snap_header_round_trips() {
    let mut snap = SnapPdu::new();
    snap.org_code = [0, 0, 0];
    snap.eth_type = 0x0800;
    let chain = Pdu::Snap(snap) / Pdu::Raw(RawPdu::new(vec![1, 2, 3]));

    let bytes = chain.serialize();
    assert_eq!(&[0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00, 0x08, 0x00][..], &bytes[..8]);

    let parsed = SnapPdu::from_bytes(&bytes).unwrap();
    assert_eq!(0x0800, parsed.eth_type);
    assert_eq!([0, 0, 0], parsed.org_code);
    //unknown ether types keep the payload as raw bytes
    assert_eq!(PduType::Raw, parsed.inner().unwrap().pdu_type());
    assert_eq!(3, parsed.inner().unwrap().header_size());
}

#[test]
fn ipv6_ether_type_dispatches_the_payload() {
    let mut buffer = vec![0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00, 0x86, 0xdd];
    buffer.extend_from_slice(&ipv6_loopback_bytes());

    let snap = SnapPdu::from_bytes(&buffer).unwrap();
    assert_eq!(ETHERTYPE_IPV6, snap.eth_type);
    assert_eq!(PduType::Ipv6, snap.inner().unwrap().pdu_type());
    assert_eq!(buffer, Pdu::Snap(snap).serialize());
}

#[test]
fn truncated_snap_headers_are_rejected() {
    assert_matches!(SnapPdu::from_bytes(&[0xaa, 0xaa, 0x03]), Err(ReadError::UnexpectedEndOfSlice(_)));
}

#[test]
fn data_frame_payload_is_snap_encapsulated() {
    //802.11 data frame wrapping snap wrapping ipv6
    let mut buffer = vec![0x08, 0x00, 0x00, 0x00];
    buffer.extend_from_slice(&[0u8; 18]); //addresses
    buffer.extend_from_slice(&[0x00, 0x00]); //sequence control
    buffer.extend_from_slice(&[0xaa, 0xaa, 0x03, 0x00, 0x00, 0x00, 0x86, 0xdd]);
    buffer.extend_from_slice(&ipv6_loopback_bytes());

    let frame = Dot11Pdu::from_bytes(&buffer).unwrap();
    assert_eq!(PduType::Dot11Data, frame.pdu_type());

    let snap = frame.inner().unwrap();
    assert_eq!(PduType::Snap, snap.pdu_type());
    let ip = snap.inner().unwrap();
    assert_eq!(PduType::Ipv6, ip.pdu_type());
    assert_eq!(PduType::Raw, ip.inner().unwrap().pdu_type());

    //the whole stack serializes back to the input
    assert_eq!(buffer, Pdu::Dot11(frame).serialize());
}

#[test]
fn garbage_payload_behind_a_data_frame_stays_raw() {
    let mut buffer = vec![0x08, 0x00, 0x00, 0x00];
    buffer.extend_from_slice(&[0u8; 18]);
    buffer.extend_from_slice(&[0x00, 0x00]);
    buffer.extend_from_slice(&[0x01, 0x02, 0x03]); //too short for a snap header

    let frame = Dot11Pdu::from_bytes(&buffer).unwrap();
    assert_eq!(PduType::Raw, frame.inner().unwrap().pdu_type());
    assert_eq!(3, frame.inner().unwrap().header_size());
}

#[test]
fn matches_response_checks_the_ether_type() {
    let mut snap = SnapPdu::new();
    snap.eth_type = 0x0800;

    let mut same = vec![0xaa, 0xaa, 0x03, 0, 0, 0, 0x08, 0x00];
    assert!(snap.matches_response(&same));
    same[7] = 0x06;
    assert!(!snap.matches_response(&same));
    assert!(!snap.matches_response(&[0xaa, 0xaa]));
}

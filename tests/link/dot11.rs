use wirecraft::*;

use proptest::prelude::*;

//scenario: beacon with SSID "test" & the classic 802.11b rate set
fn beacon_bytes() -> Vec<u8> {
    let mut buffer = vec![0x80, 0x00, 0x00, 0x00];
    buffer.extend_from_slice(&[0xff; 6]); //addr1: broadcast
    buffer.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]); //addr2
    buffer.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]); //addr3
    buffer.extend_from_slice(&[0x00, 0x00]); //sequence control
    buffer.extend_from_slice(&[0; 8]); //timestamp
    buffer.extend_from_slice(&[0x64, 0x00]); //interval 100
    buffer.extend_from_slice(&[0x11, 0x04]); //capability 0x0411
    buffer.extend_from_slice(&[0x00, 0x04, b't', b'e', b's', b't']);
    buffer.extend_from_slice(&[0x01, 0x04, 0x82, 0x84, 0x8b, 0x96]);
    buffer
}

#[test]
fn beacon_round_trip() {
    let buffer = beacon_bytes();
    let frame = Dot11Pdu::from_bytes(&buffer).unwrap();

    assert_eq!(PduType::Dot11Beacon, frame.pdu_type());
    assert_eq!(frame_type::MANAGEMENT, frame.header.frame_control.type_code());
    assert_eq!(mgmt_subtype::BEACON, frame.header.frame_control.subtype());
    assert!(frame.header.addr1.is_broadcast());
    assert_eq!(MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]), frame.header.addr2);

    match frame.body() {
        Dot11Body::Beacon(body) => {
            assert_eq!(0, body.timestamp);
            assert_eq!(100, body.interval);
            assert_eq!(0x0411, body.capability);
        },
        _ => panic!("expected a beacon body"),
    }

    assert_eq!(Some("test".to_string()), frame.essid());
    assert_eq!(Some(vec![1.0, 2.0, 5.5, 11.0]), frame.supported_rates());
    assert_eq!(2, frame.options().len());

    assert_eq!(buffer.len(), frame.header_size());
    assert_eq!(buffer, Pdu::Dot11(frame).serialize());
}

#[test]
fn beacon_crafted_by_hand_equals_the_parsed_one() {
    let mut frame = Dot11Pdu::beacon(BeaconBody {
        timestamp: 0,
        interval: 100,
        capability: 0x0411,
    });
    frame.header.addr1 = MacAddr::BROADCAST;
    frame.header.addr2 = MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    frame.header.addr3 = MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    frame.set_essid("test");
    frame.set_supported_rates(&[1.0, 2.0, 5.5, 11.0]);

    assert_eq!(beacon_bytes(), Pdu::Dot11(frame).serialize());
}

#[test]
fn frame_control_bit_accessors() {
    let mut fc = FrameControl(0);
    fc.set_type_code(frame_type::DATA);
    fc.set_subtype(data_subtype::QOS_DATA);
    fc.set_to_ds(true);
    fc.set_retry(true);
    fc.set_power_mgmt(true);
    fc.set_wep(true);
    fc.set_order(true);

    assert_eq!(0, fc.protocol_version());
    assert_eq!(frame_type::DATA, fc.type_code());
    assert_eq!(data_subtype::QOS_DATA, fc.subtype());
    assert!(fc.to_ds());
    assert!(!fc.from_ds());
    assert!(!fc.more_frag());
    assert!(fc.retry());
    assert!(fc.power_mgmt());
    assert!(!fc.more_data());
    assert!(fc.wep());
    assert!(fc.order());

    fc.set_to_ds(false);
    assert!(!fc.to_ds());
}

#[test]
fn sequence_control_fields_validate_their_ranges() {
    let mut header = Dot11Header::default();
    header.set_fragment_number(0xf).unwrap();
    header.set_sequence_number(0xfff).unwrap();
    assert_eq!(0xf, header.fragment_number());
    assert_eq!(0xfff, header.sequence_number());

    assert_matches!(
        header.set_fragment_number(0x10),
        Err(ValueError::U8TooLarge{ value: 0x10, max: 0xf, field: ErrorField::Dot11FragmentNumber })
    );
    assert_matches!(
        header.set_sequence_number(0x1000),
        Err(ValueError::U16TooLarge{ value: 0x1000, max: 0xfff, field: ErrorField::Dot11SequenceNumber })
    );
}

#[test]
fn addr4_is_present_iff_to_ds_and_from_ds() {
    let mut frame = Dot11Pdu::data();
    assert_eq!(24, frame.header_size());

    frame.header.frame_control.set_to_ds(true);
    assert_eq!(24, frame.header_size());

    frame.header.frame_control.set_from_ds(true);
    frame.header.addr4 = MacAddr([1, 2, 3, 4, 5, 6]);
    assert_eq!(30, frame.header_size());

    let bytes = Pdu::Dot11(frame).serialize();
    assert_eq!(30, bytes.len());

    let parsed = Dot11Pdu::from_bytes(&bytes).unwrap();
    assert!(parsed.header.has_addr4());
    assert_eq!(MacAddr([1, 2, 3, 4, 5, 6]), parsed.header.addr4);
}

#[test]
fn qos_data_carries_the_control_word() {
    let frame = Dot11Pdu::qos_data(0x0005);
    let bytes = Pdu::Dot11(frame).serialize();
    assert_eq!(26, bytes.len());
    assert_eq!([0x88, 0x00], [bytes[0], bytes[1]]);
    assert_eq!([0x05, 0x00], [bytes[24], bytes[25]]);

    let parsed = Dot11Pdu::from_bytes(&bytes).unwrap();
    assert_eq!(PduType::Dot11QosData, parsed.pdu_type());
    assert_matches!(parsed.body(), Dot11Body::QosData{ qos_control: 5 });
}

#[test]
fn short_buffers_zero_fill_the_header() {
    //only frame control & duration present
    let frame = Dot11Pdu::from_bytes(&[0x08, 0x00, 0x34, 0x12]).unwrap();
    assert_eq!(frame_type::DATA, frame.header.frame_control.type_code());
    assert_eq!(0x1234, frame.header.duration_id);
    assert_eq!(MacAddr::default(), frame.header.addr1);
    assert_eq!(PduType::Dot11Data, frame.pdu_type());

    //below the frame control size nothing can be parsed
    assert_matches!(Dot11Pdu::from_bytes(&[0x80]), Err(ReadError::UnexpectedEndOfSlice(2)));
}

#[test]
fn overrunning_tagged_parameter_ends_the_list_silently() {
    let mut buffer = beacon_bytes();
    //a tag claiming 32 value bytes with only 2 present
    buffer.extend_from_slice(&[0x03, 0x20, 0x01, 0x02]);

    let frame = Dot11Pdu::from_bytes(&buffer).unwrap();
    assert_eq!(2, frame.options().len());
    assert_eq!(Some("test".to_string()), frame.essid());
    assert!(frame.search_option(option_tag::DS_SET).is_none());
}

#[test]
fn search_option_returns_the_first_match() {
    let mut frame = Dot11Pdu::beacon(Default::default());
    frame.add_option(Dot11Option{ tag: option_tag::VENDOR_SPECIFIC, value: vec![1] });
    frame.add_option(Dot11Option{ tag: option_tag::VENDOR_SPECIFIC, value: vec![2] });
    assert_eq!(vec![1], frame.search_option(option_tag::VENDOR_SPECIFIC).unwrap().value);
}

#[test]
fn management_bodies_round_trip() {
    //association request
    let mut request = Dot11Pdu::assoc_request(AssocRequestBody {
        capability: 0x0021,
        listen_interval: 5,
    });
    request.set_essid("net");
    let parsed = Dot11Pdu::from_bytes(&Pdu::Dot11(request).serialize()).unwrap();
    assert_eq!(PduType::Dot11AssocReq, parsed.pdu_type());
    assert_matches!(parsed.body(), Dot11Body::AssocRequest(AssocRequestBody{ capability: 0x0021, listen_interval: 5 }));
    assert_eq!(Some("net".to_string()), parsed.essid());

    //association response
    let response = Dot11Pdu::assoc_response(AssocResponseBody {
        capability: 0x0021,
        status_code: 0,
        association_id: 0xc001,
    });
    let parsed = Dot11Pdu::from_bytes(&Pdu::Dot11(response).serialize()).unwrap();
    assert_eq!(PduType::Dot11AssocResp, parsed.pdu_type());
    assert_matches!(parsed.body(), Dot11Body::AssocResponse(AssocResponseBody{ association_id: 0xc001, .. }));

    //disassociation
    let disassoc = Dot11Pdu::disassoc(DisassocBody{ reason_code: 8 });
    let parsed = Dot11Pdu::from_bytes(&Pdu::Dot11(disassoc).serialize()).unwrap();
    assert_eq!(PduType::Dot11Disassoc, parsed.pdu_type());
    assert_matches!(parsed.body(), Dot11Body::Disassoc(DisassocBody{ reason_code: 8 }));
}

#[test]
fn rates_use_half_mbit_units_with_the_basic_bit() {
    assert_eq!(vec![0x82, 0x84, 0x8b, 0x96], serialize_rates(&[1.0, 2.0, 5.5, 11.0]));
    assert_eq!(
        vec![0x0c, 0x12, 0x18, 0x24, 0x30, 0x48, 0x60, 0x6c],
        serialize_rates(&[6.0, 9.0, 12.0, 18.0, 24.0, 36.0, 48.0, 54.0])
    );
    assert_eq!(vec![1.0, 2.0, 5.5, 11.0], deserialize_rates(&[0x82, 0x84, 0x8b, 0x96]));
    assert_eq!(vec![6.0], deserialize_rates(&[0x0c]));
}

#[test]
fn rsn_information_round_trips() {
    let rsn = RsnInformation::wpa2_psk();
    let bytes = rsn.serialize();
    assert_eq!(20, bytes.len());
    assert_eq!([0x01, 0x00], [bytes[0], bytes[1]]); //version 1
    assert_eq!(&[0x00, 0x0f, 0xac, 0x04][..], &bytes[2..6]); //ccmp group suite

    assert_eq!(rsn, RsnInformation::from_bytes(&bytes).unwrap());
    assert_matches!(
        RsnInformation::from_bytes(&bytes[..bytes.len() - 3]),
        Err(ReadError::Dot11RsnInvalidLength(_))
    );
}

#[test]
fn rsn_information_travels_as_a_tagged_parameter() {
    let mut frame = Dot11Pdu::beacon(Default::default());
    frame.set_rsn_information(&RsnInformation::wpa2_psk());
    assert!(frame.search_option(option_tag::RSN).is_some());

    let parsed = Dot11Pdu::from_bytes(&Pdu::Dot11(frame).serialize()).unwrap();
    assert_eq!(RsnInformation::wpa2_psk(), parsed.rsn_information().unwrap().unwrap());
}

#[test]
fn matches_response_requires_mirrored_addresses() {
    let mut frame = Dot11Pdu::data();
    frame.header.addr1 = MacAddr([1, 1, 1, 1, 1, 1]);
    frame.header.addr2 = MacAddr([2, 2, 2, 2, 2, 2]);

    let reply = |addr1: MacAddr, addr2: MacAddr| {
        let mut pdu = Dot11Pdu::data();
        pdu.header.addr1 = addr1;
        pdu.header.addr2 = addr2;
        Pdu::Dot11(pdu).serialize()
    };

    assert!(frame.matches_response(&reply(MacAddr([2, 2, 2, 2, 2, 2]), MacAddr([1, 1, 1, 1, 1, 1]))));
    assert!(!frame.matches_response(&reply(MacAddr([1, 1, 1, 1, 1, 1]), MacAddr([2, 2, 2, 2, 2, 2]))));
    assert!(!frame.matches_response(&[0x08, 0x00]));
}

proptest! {
    #[test]
    fn rates_round_trip(units in proptest::collection::vec(1u8..=127, 0..8)) {
        let rates: Vec<f32> = units.iter().map(|unit| f32::from(*unit) / 2.0).collect();
        prop_assert_eq!(rates.clone(), deserialize_rates(&serialize_rates(&rates)));
    }
}

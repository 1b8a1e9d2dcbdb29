use wirecraft::*;

fn parse_marker(buffer: &[u8]) -> Result<Pdu, ReadError> {
    Ok(Pdu::Udp(UdpPdu::from_bytes(buffer)?))
}

fn minimal_udp_bytes() -> Vec<u8> {
    vec![0x00, 0x35, 0x00, 0x35, 0x00, 0x08, 0x00, 0x00]
}

#[test]
fn dispatch_table_defaults_cover_the_transport_protocols() {
    let table = DispatchTable::with_defaults();
    assert!(table.constructor_for(ip_number::TCP).is_some());
    assert!(table.constructor_for(ip_number::UDP).is_some());
    assert_eq!(Some(ip_number::TCP), table.id_of(PduType::Tcp));
    assert_eq!(Some(ip_number::UDP), table.id_of(PduType::Udp));

    assert!(table.constructor_for(200).is_none());
    assert_eq!(None, table.id_of(PduType::Dns));
}

#[test]
fn registration_is_idempotent_and_rejects_conflicts() {
    let mut table = DispatchTable::new();
    table.register(99, PduType::Udp, parse_marker).unwrap();
    //the exact same registration is allowed
    table.register(99, PduType::Udp, parse_marker).unwrap();
    //a different value under the same id is not
    assert_matches!(
        table.register(99, PduType::Tcp, TcpPdu::parse_pdu),
        Err(RegistryError::ConflictingRegistration{ id: 99 })
    );
    //the original registration stays
    assert_eq!(Some(99), table.id_of(PduType::Udp));
}

#[test]
fn process_registry_dispatches_custom_constructors() {
    register_pdu(222, PduType::Udp, parse_marker).unwrap();
    //idempotent at process level too
    register_pdu(222, PduType::Udp, parse_marker).unwrap();

    let mut ip = Ipv6Pdu::new();
    ip.set_last_next_header(222);
    let mut buffer = Pdu::Ipv6(ip).serialize();
    buffer.extend_from_slice(&minimal_udp_bytes());

    let parsed = Ipv6Pdu::from_bytes(&buffer).unwrap();
    assert_eq!(PduType::Udp, parsed.inner().unwrap().pdu_type());
}

#[test]
fn ipv6_allocator_registry_is_the_second_fallback() {
    register_ipv6_ext(253, PduType::Udp, parse_marker).unwrap();

    let mut ip = Ipv6Pdu::new();
    ip.set_last_next_header(253);
    let mut buffer = Pdu::Ipv6(ip).serialize();
    buffer.extend_from_slice(&minimal_udp_bytes());

    let parsed = Ipv6Pdu::from_bytes(&buffer).unwrap();
    assert_eq!(PduType::Udp, parsed.inner().unwrap().pdu_type());
}

#[test]
fn unregistered_ids_fall_back_to_raw() {
    let mut ip = Ipv6Pdu::new();
    ip.set_last_next_header(199);
    let mut buffer = Pdu::Ipv6(ip).serialize();
    buffer.extend_from_slice(&[1, 2, 3]);

    let parsed = Ipv6Pdu::from_bytes(&buffer).unwrap();
    let inner = parsed.inner().unwrap();
    assert_eq!(PduType::Raw, inner.pdu_type());
    assert_eq!(3, inner.header_size());
}

#[test]
fn conflicting_process_registration_is_rejected() {
    //the default table owns the tcp id already
    assert_matches!(
        register_pdu(ip_number::TCP, PduType::Udp, parse_marker),
        Err(RegistryError::ConflictingRegistration{ id: ip_number::TCP })
    );
}

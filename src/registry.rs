use super::*;

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

///Constructor capable of parsing one protocol unit (and its inner chain)
///from a byte buffer.
pub type PduConstructor = fn(&[u8]) -> Result<Pdu, ReadError>;

///An injectable dispatch table translating numeric next-protocol ids into
///parser constructors and protocol identities back into ids for writing.
///
///Two process wide instances exist (see [`register_pdu`] and
///[`register_ipv6_ext`]), but a table can also be built standalone for tests.
#[derive(Clone, Default)]
pub struct DispatchTable {
    constructors: HashMap<u8, (PduType, PduConstructor)>,
    ids: HashMap<PduType, u8>,
}

impl DispatchTable {

    ///Creates an empty dispatch table.
    pub fn new() -> DispatchTable {
        DispatchTable {
            constructors: HashMap::new(),
            ids: HashMap::new(),
        }
    }

    ///Creates a dispatch table with the built in transport protocols
    ///registered (TCP & UDP).
    pub fn with_defaults() -> DispatchTable {
        let mut table = DispatchTable::new();
        //ids from the iana protocol numbers registry, conflicts are impossible
        //on a fresh table
        let _ = table.register(ip_number::TCP, PduType::Tcp, TcpPdu::parse_pdu);
        let _ = table.register(ip_number::UDP, PduType::Udp, UdpPdu::parse_pdu);
        table
    }

    ///Registers a constructor for the given id.
    ///
    ///Registering the exact same (id, identity, constructor) triplet twice is
    ///allowed and does nothing; registering an id that is already taken by a
    ///different value is rejected.
    pub fn register(&mut self, id: u8, pdu_type: PduType, constructor: PduConstructor) -> Result<(), RegistryError> {
        match self.constructors.get(&id) {
            Some((registered_type, registered_constructor)) => {
                if *registered_type == pdu_type && *registered_constructor == constructor {
                    Ok(())
                } else {
                    Err(RegistryError::ConflictingRegistration{ id })
                }
            },
            None => {
                trace!(id, ?pdu_type, "registering pdu constructor");
                self.constructors.insert(id, (pdu_type, constructor));
                //first registration wins the reverse direction in case two ids
                //name the same identity
                self.ids.entry(pdu_type).or_insert(id);
                Ok(())
            }
        }
    }

    ///Looks up the constructor registered for the given id.
    pub fn constructor_for(&self, id: u8) -> Option<PduConstructor> {
        self.constructors.get(&id).map(|(_, constructor)| *constructor)
    }

    ///Looks up the numeric id a protocol identity is written as.
    pub fn id_of(&self, pdu_type: PduType) -> Option<u8> {
        self.ids.get(&pdu_type).copied()
    }
}

fn read_lock(lock: &RwLock<DispatchTable>) -> RwLockReadGuard<'_, DispatchTable> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock(lock: &RwLock<DispatchTable>) -> RwLockWriteGuard<'_, DispatchTable> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn pdu_registry() -> &'static RwLock<DispatchTable> {
    static REGISTRY: OnceLock<RwLock<DispatchTable>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(DispatchTable::with_defaults()))
}

fn ipv6_ext_registry() -> &'static RwLock<DispatchTable> {
    static REGISTRY: OnceLock<RwLock<DispatchTable>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(DispatchTable::new()))
}

///Registers a constructor for an ip protocol number in the process wide
///dispatch registry. Meant to be called at process init; the registry is
///read-only during parsing.
pub fn register_pdu(id: u8, pdu_type: PduType, constructor: PduConstructor) -> Result<(), RegistryError> {
    write_lock(pdu_registry()).register(id, pdu_type, constructor)
}

///Registers a constructor for an IPv6 specific next-header id in the process
///wide IPv6 allocator registry. Consulted by the IPv6 parser after the
///general dispatch registry.
pub fn register_ipv6_ext(id: u8, pdu_type: PduType, constructor: PduConstructor) -> Result<(), RegistryError> {
    write_lock(ipv6_ext_registry()).register(id, pdu_type, constructor)
}

///Parses a payload with the constructor registered for the given ip protocol
///number. `None` if no constructor is registered.
pub fn pdu_for_id(id: u8, buffer: &[u8]) -> Option<Result<Pdu, ReadError>> {
    let constructor = read_lock(pdu_registry()).constructor_for(id)?;
    Some(constructor(buffer))
}

///Parses a payload with the constructor registered in the IPv6 allocator
///registry. `None` if no constructor is registered.
pub fn ipv6_ext_for_id(id: u8, buffer: &[u8]) -> Option<Result<Pdu, ReadError>> {
    let constructor = read_lock(ipv6_ext_registry()).constructor_for(id)?;
    Some(constructor(buffer))
}

///Looks up the numeric discriminator a protocol identity is serialized as,
///checking the dispatch registry first and the IPv6 allocator registry as a
///fallback.
pub fn id_for_pdu_type(pdu_type: PduType) -> Option<u8> {
    read_lock(pdu_registry())
        .id_of(pdu_type)
        .or_else(|| read_lock(ipv6_ext_registry()).id_of(pdu_type))
}

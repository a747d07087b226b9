//! Network address descriptors.
//!
//! An [`AddressDescriptor`] is an immutable opaque byte value tagged with an
//! [`AddressType`]. The byte layout per type is fixed:
//!
//! - `Interface`: interface index, 4 bytes big-endian
//! - `Inet`: 4 address octets followed by a big-endian port
//! - `Inet6`: 16 address octets followed by a big-endian port
//! - `Link`: raw link-layer address (e.g. a 6-byte MAC)
//! - `Unix`: UTF-8 socket path
//!
//! On the wire an address is `{"ADDRESSTYPE": "LINK", "DATA": "<base64>"}`.

use crate::error::{CcnxError, CcnxResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6};

/// The kind of value an address carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AddressType {
    /// IPv4 address and port.
    Inet,
    /// IPv6 address and port.
    Inet6,
    /// Link-layer address.
    Link,
    /// Interface index.
    #[serde(rename = "IFACE")]
    Interface,
    /// Unix domain socket path.
    Unix,
}

impl AddressType {
    /// The wire token for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inet => "INET",
            Self::Inet6 => "INET6",
            Self::Link => "LINK",
            Self::Interface => "IFACE",
            Self::Unix => "UNIX",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable, typed address value. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "AddressJson", try_from = "AddressJson")]
pub struct AddressDescriptor {
    kind: AddressType,
    data: Vec<u8>,
}

impl AddressDescriptor {
    /// Builds an address from a type tag and its raw bytes.
    ///
    /// The bytes are validated against the layout the tag requires.
    pub fn new(kind: AddressType, data: impl Into<Vec<u8>>) -> CcnxResult<Self> {
        let data = data.into();
        let ok = match kind {
            AddressType::Interface => data.len() == 4,
            AddressType::Inet => data.len() == 6,
            AddressType::Inet6 => data.len() == 18,
            AddressType::Link => !data.is_empty(),
            AddressType::Unix => std::str::from_utf8(&data).is_ok(),
        };
        if !ok {
            return Err(CcnxError::InvalidAddress(format!(
                "{} bytes is not a valid {kind} payload",
                data.len()
            )));
        }
        Ok(Self { kind, data })
    }

    /// An address naming a local interface by index.
    pub fn from_interface(ifidx: u32) -> Self {
        Self {
            kind: AddressType::Interface,
            data: ifidx.to_be_bytes().to_vec(),
        }
    }

    /// A link-layer address.
    ///
    /// # Panics
    ///
    /// Panics if `mac` is empty.
    pub fn from_link(mac: &[u8]) -> Self {
        assert!(!mac.is_empty(), "link address must not be empty");
        Self {
            kind: AddressType::Link,
            data: mac.to_vec(),
        }
    }

    /// An IPv4 socket address.
    pub fn from_inet(addr: SocketAddrV4) -> Self {
        let mut data = addr.ip().octets().to_vec();
        data.extend_from_slice(&addr.port().to_be_bytes());
        Self {
            kind: AddressType::Inet,
            data,
        }
    }

    /// An IPv6 socket address. Flow info and scope id are not carried.
    pub fn from_inet6(addr: SocketAddrV6) -> Self {
        let mut data = addr.ip().octets().to_vec();
        data.extend_from_slice(&addr.port().to_be_bytes());
        Self {
            kind: AddressType::Inet6,
            data,
        }
    }

    /// A unix domain socket path.
    pub fn from_unix(path: &str) -> Self {
        Self {
            kind: AddressType::Unix,
            data: path.as_bytes().to_vec(),
        }
    }

    /// The type tag.
    pub fn address_type(&self) -> AddressType {
        self.kind
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn expect_kind(&self, kind: AddressType) -> CcnxResult<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(CcnxError::InvalidAddress(format!(
                "expected {kind} address, got {}",
                self.kind
            )))
        }
    }

    /// The interface index of an `Interface` address.
    pub fn interface_index(&self) -> CcnxResult<u32> {
        self.expect_kind(AddressType::Interface)?;
        let bytes: [u8; 4] = self.data[..]
            .try_into()
            .map_err(|_| CcnxError::InvalidAddress("truncated interface index".into()))?;
        Ok(u32::from_be_bytes(bytes))
    }

    /// The socket address of an `Inet` address.
    pub fn inet(&self) -> CcnxResult<SocketAddrV4> {
        self.expect_kind(AddressType::Inet)?;
        let (ip, port) = split_port::<4>(&self.data)?;
        Ok(SocketAddrV4::new(Ipv4Addr::from(ip), port))
    }

    /// The socket address of an `Inet6` address.
    pub fn inet6(&self) -> CcnxResult<SocketAddrV6> {
        self.expect_kind(AddressType::Inet6)?;
        let (ip, port) = split_port::<16>(&self.data)?;
        Ok(SocketAddrV6::new(Ipv6Addr::from(ip), port, 0, 0))
    }

    /// The raw bytes of a `Link` address.
    pub fn link(&self) -> CcnxResult<&[u8]> {
        self.expect_kind(AddressType::Link)?;
        Ok(&self.data)
    }

    /// The path of a `Unix` address.
    pub fn unix_path(&self) -> CcnxResult<&str> {
        self.expect_kind(AddressType::Unix)?;
        std::str::from_utf8(&self.data)
            .map_err(|e| CcnxError::InvalidAddress(format!("unix path is not UTF-8: {e}")))
    }
}

fn split_port<const N: usize>(data: &[u8]) -> CcnxResult<([u8; N], u16)> {
    if data.len() != N + 2 {
        return Err(CcnxError::InvalidAddress(format!(
            "expected {} bytes, got {}",
            N + 2,
            data.len()
        )));
    }
    let mut ip = [0u8; N];
    ip.copy_from_slice(&data[..N]);
    let port = u16::from_be_bytes([data[N], data[N + 1]]);
    Ok((ip, port))
}

impl fmt::Display for AddressDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AddressType::Interface => match self.interface_index() {
                Ok(ifidx) => write!(f, "IFACE {ifidx}"),
                Err(_) => write!(f, "IFACE <invalid>"),
            },
            AddressType::Inet => match self.inet() {
                Ok(addr) => write!(f, "INET {addr}"),
                Err(_) => write!(f, "INET <invalid>"),
            },
            AddressType::Inet6 => match self.inet6() {
                Ok(addr) => write!(f, "INET6 {addr}"),
                Err(_) => write!(f, "INET6 <invalid>"),
            },
            AddressType::Link => {
                let hex: Vec<String> = self.data.iter().map(|b| format!("{b:02x}")).collect();
                write!(f, "LINK {}", hex.join(":"))
            }
            AddressType::Unix => write!(f, "UNIX {}", String::from_utf8_lossy(&self.data)),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct AddressJson {
    #[serde(rename = "ADDRESSTYPE")]
    kind: AddressType,
    #[serde(rename = "DATA")]
    data: String,
}

impl From<AddressDescriptor> for AddressJson {
    fn from(addr: AddressDescriptor) -> Self {
        Self {
            kind: addr.kind,
            data: BASE64.encode(&addr.data),
        }
    }
}

impl TryFrom<AddressJson> for AddressDescriptor {
    type Error = CcnxError;

    fn try_from(json: AddressJson) -> CcnxResult<Self> {
        let data = BASE64
            .decode(json.data.as_bytes())
            .map_err(|e| CcnxError::InvalidAddress(format!("bad base64 data: {e}")))?;
        Self::new(json.kind, data)
    }
}

/// An ordered list of addresses. Order is significant for equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressList {
    addresses: Vec<AddressDescriptor>,
}

impl AddressList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an address and returns the list, for chaining.
    pub fn append(mut self, address: AddressDescriptor) -> Self {
        self.addresses.push(address);
        self
    }

    /// Appends an address in place.
    pub fn push(&mut self, address: AddressDescriptor) {
        self.addresses.push(address);
    }

    /// Number of addresses.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Returns true if the list holds no addresses.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// The address at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&AddressDescriptor> {
        self.addresses.get(index)
    }

    /// Iterates the addresses in order.
    pub fn iter(&self) -> std::slice::Iter<'_, AddressDescriptor> {
        self.addresses.iter()
    }
}

impl FromIterator<AddressDescriptor> for AddressList {
    fn from_iter<I: IntoIterator<Item = AddressDescriptor>>(iter: I) -> Self {
        Self {
            addresses: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AddressList {
    type Item = &'a AddressDescriptor;
    type IntoIter = std::slice::Iter<'a, AddressDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.iter()
    }
}

impl fmt::Display for AddressList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, addr) in self.addresses.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{addr}")?;
        }
        f.write_str("]")
    }
}

//! Device and power domain identification
//!
//! Properties reported by Sysman during discovery, and the classification of
//! a power domain as card-wide or tile-scoped.

use crate::sysman::ffi::ZE_MAX_DEVICE_UUID_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw 16-byte device UUID as returned by the interface
pub type DeviceUuid = [u8; ZE_MAX_DEVICE_UUID_SIZE];

/// Device properties needed for identification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProperties {
    /// Model string (e.g., "Intel(R) Data Center GPU Max 1550")
    pub model_name: String,
    /// Core device UUID
    pub uuid: DeviceUuid,
}

impl DeviceProperties {
    pub fn new(model_name: impl Into<String>, uuid: DeviceUuid) -> Self {
        Self {
            model_name: model_name.into(),
            uuid,
        }
    }
}

/// Power domain properties needed for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerProperties {
    /// True when the domain is scoped to a single sub-device
    pub on_subdevice: bool,
    /// Sub-device index, meaningful only when `on_subdevice` is set
    pub subdevice_id: u32,
}

impl PowerProperties {
    /// Card-wide domain
    pub const fn card() -> Self {
        Self {
            on_subdevice: false,
            subdevice_id: 0,
        }
    }

    /// Domain scoped to tile `id`
    pub const fn tile(id: u32) -> Self {
        Self {
            on_subdevice: true,
            subdevice_id: id,
        }
    }
}

/// What a power domain measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    /// The whole card
    Card,
    /// One sub-device ("tile")
    Tile(u32),
}

impl DomainKind {
    #[inline]
    pub fn is_card_level(&self) -> bool {
        matches!(self, DomainKind::Card)
    }

    /// Tile index, `None` for the card-level domain
    pub fn subdevice_id(&self) -> Option<u32> {
        match self {
            DomainKind::Card => None,
            DomainKind::Tile(id) => Some(*id),
        }
    }
}

impl From<PowerProperties> for DomainKind {
    fn from(props: PowerProperties) -> Self {
        if props.on_subdevice {
            DomainKind::Tile(props.subdevice_id)
        } else {
            DomainKind::Card
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` so width/alignment flags apply to the label
        match self {
            DomainKind::Card => f.pad("Card Total"),
            DomainKind::Tile(id) => f.pad(&format!("Tile {}", id)),
        }
    }
}

/// Identity of a tracked device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Model name
    pub name: String,
    /// Colon-separated lowercase hex UUID
    pub uuid: String,
}

impl DeviceInfo {
    pub fn new(name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
        }
    }
}

impl From<&DeviceProperties> for DeviceInfo {
    fn from(props: &DeviceProperties) -> Self {
        Self::new(props.model_name.clone(), format_uuid(&props.uuid))
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.uuid)
    }
}

/// Render a UUID as `xx:xx:...:xx`, keeping the interface's byte order
pub fn format_uuid(uuid: &DeviceUuid) -> String {
    uuid.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uuid_sequential_bytes() {
        let uuid: DeviceUuid = std::array::from_fn(|i| i as u8);
        assert_eq!(
            format_uuid(&uuid),
            "00:01:02:03:04:05:06:07:08:09:0a:0b:0c:0d:0e:0f"
        );
    }

    #[test]
    fn test_format_uuid_high_bytes_lowercase() {
        let mut uuid = [0u8; 16];
        uuid[0] = 0xAB;
        uuid[15] = 0xFF;
        let rendered = format_uuid(&uuid);
        assert!(rendered.starts_with("ab:"));
        assert!(rendered.ends_with(":ff"));
        assert_eq!(rendered.len(), 16 * 2 + 15);
    }

    #[test]
    fn test_domain_kind_from_properties() {
        assert_eq!(DomainKind::from(PowerProperties::card()), DomainKind::Card);
        assert_eq!(DomainKind::from(PowerProperties::tile(1)), DomainKind::Tile(1));

        // subdevice id is ignored for card-level domains
        let props = PowerProperties {
            on_subdevice: false,
            subdevice_id: 3,
        };
        assert!(DomainKind::from(props).is_card_level());
    }

    #[test]
    fn test_domain_kind_labels() {
        assert_eq!(DomainKind::Card.to_string(), "Card Total");
        assert_eq!(DomainKind::Tile(2).to_string(), "Tile 2");
        assert_eq!(format!("{:<12}|", DomainKind::Tile(0)), "Tile 0      |");
        assert_eq!(DomainKind::Tile(4).subdevice_id(), Some(4));
        assert_eq!(DomainKind::Card.subdevice_id(), None);
    }

    #[test]
    fn test_device_info_from_properties() {
        let props = DeviceProperties::new("Intel Arc A770", [0x11; 16]);
        let info = DeviceInfo::from(&props);
        assert_eq!(info.name, "Intel Arc A770");
        assert!(info.uuid.starts_with("11:11"));
    }
}

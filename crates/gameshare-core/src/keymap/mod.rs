//! Key and mouse-button translation for input injection.
//!
//! The browser identifies keys by `KeyboardEvent.key` ("Enter", "a", " ")
//! with an optional numeric `keyCode`, and mouse buttons by a small index.
//! The injector needs platform codes: Windows virtual-key codes and
//! `MOUSEEVENTF_*` flag pairs.
//!
//! Translation never fails loudly.  An identifier with no mapping yields
//! `None`, and the caller logs and discards that single event.

pub mod windows_vk;

use std::fmt;

use tracing::trace;

/// A platform virtual-key code (Windows `VIRTUAL_KEY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualKey(pub u16);

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VK {:#04x}", self.0)
    }
}

/// A single mouse button transition flag (Windows `MOUSEEVENTF_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonSignal(pub u32);

/// The press and release signals for one mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonSignals {
    pub press: ButtonSignal,
    pub release: ButtonSignal,
}

/// Stateless translator from browser identifiers to platform codes.
pub struct KeyTranslator;

impl KeyTranslator {
    /// Translates a key identifier to a virtual-key code.
    ///
    /// Lookup order:
    /// 1. the named-key table, then single ASCII letters (either case) and
    ///    digits;
    /// 2. `raw_code` verbatim, when present and non-zero;
    /// 3. the upper-cased value of a single-character identifier, when it is
    ///    a valid VK code (1..=0xFE);
    /// 4. otherwise `None`.
    pub fn translate_key(identifier: &str, raw_code: Option<u16>) -> Option<VirtualKey> {
        if let Some(vk) =
            windows_vk::named_key(identifier).or_else(|| windows_vk::alphanumeric_key(identifier))
        {
            return Some(VirtualKey(vk));
        }

        if let Some(code) = raw_code.filter(|&c| c != 0) {
            trace!("key {identifier:?} not in table; using raw code {code}");
            return Some(VirtualKey(code));
        }

        derive_from_char(identifier).map(VirtualKey)
    }

    /// Translates a DOM mouse button index (0 = primary, 1 = middle,
    /// 2 = secondary) to its press/release signal pair.
    pub fn translate_button(index: i64) -> Option<ButtonSignals> {
        let slot = usize::try_from(index).ok()?;
        windows_vk::BUTTON_FLAGS
            .get(slot)
            .map(|&(press, release)| ButtonSignals {
                press: ButtonSignal(press),
                release: ButtonSignal(release),
            })
    }
}

fn derive_from_char(identifier: &str) -> Option<u16> {
    let mut chars = identifier.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let mut upper = c.to_uppercase();
    let u = upper.next()?;
    if upper.next().is_some() {
        // e.g. 'ß' upper-cases to "SS"
        return None;
    }
    u16::try_from(u32::from(u))
        .ok()
        .filter(|&code| (1..=windows_vk::VK_MAX).contains(&code))
}

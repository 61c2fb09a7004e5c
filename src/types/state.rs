// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Valve state values reported to the host.
//!
//! A valve service distinguishes between being commanded on ([`Active`]) and
//! actually operating ([`InUse`]). The simulated pump reports both from the
//! same running flag.

use std::fmt;

use crate::host::CharacteristicValue;

/// Whether the valve is commanded on.
///
/// # Examples
///
/// ```
/// use recirc_pump::types::Active;
///
/// assert_eq!(Active::from(true), Active::Active);
/// assert_eq!(Active::Inactive.as_num(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Active {
    /// The valve is off.
    #[default]
    Inactive,
    /// The valve is on.
    Active,
}

impl Active {
    /// Returns the numeric value used on the accessory protocol.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Inactive => 0,
            Self::Active => 1,
        }
    }

    /// Returns `true` for [`Active::Active`].
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for Active {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "INACTIVE"),
            Self::Active => write!(f, "ACTIVE"),
        }
    }
}

impl From<bool> for Active {
    fn from(value: bool) -> Self {
        if value { Self::Active } else { Self::Inactive }
    }
}

impl From<Active> for CharacteristicValue {
    fn from(value: Active) -> Self {
        Self::UInt8(value.as_num())
    }
}

/// Whether fluid is currently flowing through the valve.
///
/// # Examples
///
/// ```
/// use recirc_pump::types::InUse;
///
/// assert_eq!(InUse::from(false), InUse::NotInUse);
/// assert_eq!(InUse::InUse.as_num(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InUse {
    /// Nothing is flowing.
    #[default]
    NotInUse,
    /// The pump is running.
    InUse,
}

impl InUse {
    /// Returns the numeric value used on the accessory protocol.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::NotInUse => 0,
            Self::InUse => 1,
        }
    }

    /// Returns `true` for [`InUse::InUse`].
    #[must_use]
    pub const fn is_in_use(&self) -> bool {
        matches!(self, Self::InUse)
    }
}

impl fmt::Display for InUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInUse => write!(f, "NOT_IN_USE"),
            Self::InUse => write!(f, "IN_USE"),
        }
    }
}

impl From<bool> for InUse {
    fn from(value: bool) -> Self {
        if value { Self::InUse } else { Self::NotInUse }
    }
}

impl From<InUse> for CharacteristicValue {
    fn from(value: InUse) -> Self {
        Self::UInt8(value.as_num())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_numeric_values() {
        assert_eq!(Active::Inactive.as_num(), 0);
        assert_eq!(Active::Active.as_num(), 1);
    }

    #[test]
    fn in_use_numeric_values() {
        assert_eq!(InUse::NotInUse.as_num(), 0);
        assert_eq!(InUse::InUse.as_num(), 1);
    }

    #[test]
    fn defaults_are_off() {
        assert_eq!(Active::default(), Active::Inactive);
        assert_eq!(InUse::default(), InUse::NotInUse);
    }

    #[test]
    fn from_bool() {
        assert!(Active::from(true).is_active());
        assert!(!Active::from(false).is_active());
        assert!(InUse::from(true).is_in_use());
        assert!(!InUse::from(false).is_in_use());
    }

    #[test]
    fn into_characteristic_value() {
        assert_eq!(
            CharacteristicValue::from(Active::Active),
            CharacteristicValue::UInt8(1)
        );
        assert_eq!(
            CharacteristicValue::from(InUse::NotInUse),
            CharacteristicValue::UInt8(0)
        );
    }

    #[test]
    fn display() {
        assert_eq!(Active::Active.to_string(), "ACTIVE");
        assert_eq!(InUse::NotInUse.to_string(), "NOT_IN_USE");
    }
}

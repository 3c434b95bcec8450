//! Leveled assertions. Checks at a level above [`PUMPKIN_ASSERT_LEVEL_DEFINITION`] compile to
//! nothing, which allows expensive consistency checks of the graph domains and the one-tree
//! structures to be left in the code.

#[cfg(not(feature = "debug-checks"))]
pub const PUMPKIN_ASSERT_LEVEL_DEFINITION: u8 = PUMPKIN_ASSERT_SIMPLE;
#[cfg(feature = "debug-checks")]
pub const PUMPKIN_ASSERT_LEVEL_DEFINITION: u8 = PUMPKIN_ASSERT_EXTREME;

/// Cheap checks, e.g. on arguments.
pub const PUMPKIN_ASSERT_SIMPLE: u8 = 1;
/// Checks linear in the size of a structure.
pub const PUMPKIN_ASSERT_MODERATE: u8 = 2;
/// Checks which compare both bounds of a graph domain.
pub const PUMPKIN_ASSERT_ADVANCED: u8 = 3;
/// Recomputations from scratch.
pub const PUMPKIN_ASSERT_EXTREME: u8 = 4;

pub const fn is_checked(level: u8) -> bool {
    PUMPKIN_ASSERT_LEVEL_DEFINITION >= level
}

#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_simple {
    ($($arg:tt)*) => {
        if $crate::pumpkin_asserts::is_checked($crate::pumpkin_asserts::PUMPKIN_ASSERT_SIMPLE) {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::pumpkin_asserts::is_checked($crate::pumpkin_asserts::PUMPKIN_ASSERT_SIMPLE) {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::pumpkin_asserts::is_checked($crate::pumpkin_asserts::PUMPKIN_ASSERT_MODERATE) {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::pumpkin_asserts::is_checked($crate::pumpkin_asserts::PUMPKIN_ASSERT_ADVANCED) {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::pumpkin_asserts::is_checked($crate::pumpkin_asserts::PUMPKIN_ASSERT_EXTREME) {
            assert!($($arg)*);
        }
    };
}

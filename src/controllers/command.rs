//! # Commands exchanged between views and controllers.
//!
//! A [`Command`] is an opaque token identified by a [`CommandId`] with an optional
//! typed payload. Two commands are equal when their ids are equal; the payload
//! never takes part in comparison.
//!
//! ## Identity kinds
//! - [`CommandId::Name`]: a string, e.g. `"close"`;
//! - [`CommandId::Int`]: a bare integer;
//! - [`CommandId::Enum`]: a value of a user enum, compared by enum type and code.
//!
//! ## Example
//! ```
//! use viewvisor::Command;
//!
//! #[derive(Clone, Copy, Debug, PartialEq)]
//! enum MenuCommand { Play = 1, Quit = 2 }
//!
//! impl From<MenuCommand> for i64 {
//!     fn from(c: MenuCommand) -> i64 { c as i64 }
//! }
//!
//! let cmd = Command::from_enum(MenuCommand::Play).with_payload(3_u32);
//! assert!(cmd.is_enum(MenuCommand::Play));
//! assert!(!cmd.is_enum(MenuCommand::Quit));
//! assert_eq!(cmd.payload::<u32>(), Some(&3));
//! assert_ne!(cmd, Command::int(1)); // same code, different kind
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Identity of a command.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum CommandId {
    /// String identity.
    Name(Arc<str>),
    /// Integer identity.
    Int(i64),
    /// Enum identity: enum type plus the variant code.
    Enum {
        /// Enum type.
        type_id: TypeId,
        /// Enum type name (diagnostics only).
        type_name: &'static str,
        /// Variant code.
        code: i64,
    },
}

impl fmt::Debug for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandId::Name(name) => write!(f, "{name:?}"),
            CommandId::Int(n) => write!(f, "#{n}"),
            CommandId::Enum {
                type_name, code, ..
            } => write!(f, "{type_name}({code})"),
        }
    }
}

/// Command with optional payload.
#[derive(Clone)]
pub struct Command {
    id: CommandId,
    payload: Option<Arc<dyn Any + Send + Sync>>,
}

impl Command {
    /// Creates a command from an identity.
    pub fn new(id: CommandId) -> Self {
        Self { id, payload: None }
    }

    /// Creates a string-identified command.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::new(CommandId::Name(name.into()))
    }

    /// Creates an integer-identified command.
    pub fn int(code: i64) -> Self {
        Self::new(CommandId::Int(code))
    }

    /// Creates an enum-identified command.
    pub fn from_enum<E>(value: E) -> Self
    where
        E: Into<i64> + 'static,
    {
        Self::new(CommandId::Enum {
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
            code: value.into(),
        })
    }

    /// Attaches a typed payload.
    pub fn with_payload<T: Any + Send + Sync>(mut self, payload: T) -> Self {
        self.payload = Some(Arc::new(payload));
        self
    }

    #[inline]
    pub fn id(&self) -> &CommandId {
        &self.id
    }

    /// Returns the payload if it has type `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|p| p.downcast_ref::<T>())
    }

    /// Name of a string-identified command.
    pub fn name(&self) -> Option<&str> {
        match &self.id {
            CommandId::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    /// Returns `true` if this command carries exactly `value`.
    pub fn is_enum<E>(&self, value: E) -> bool
    where
        E: Into<i64> + 'static,
    {
        let expected: i64 = value.into();
        matches!(
            &self.id,
            CommandId::Enum { type_id, code, .. }
                if *type_id == TypeId::of::<E>() && *code == expected
        )
    }

    /// Decodes an enum-identified command back into `E`.
    pub fn as_enum<E>(&self) -> Option<E>
    where
        E: TryFrom<i64> + 'static,
    {
        match &self.id {
            CommandId::Enum { type_id, code, .. } if *type_id == TypeId::of::<E>() => {
                E::try_from(*code).ok()
            }
            _ => None,
        }
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Command {}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("payload", &self.payload.is_some())
            .finish()
    }
}

impl From<&'static str> for Command {
    fn from(name: &'static str) -> Self {
        Command::named(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Nav {
        Back = 1,
        Home = 2,
    }

    impl From<Nav> for i64 {
        fn from(n: Nav) -> i64 {
            n as i64
        }
    }

    impl TryFrom<i64> for Nav {
        type Error = ();

        fn try_from(v: i64) -> Result<Self, ()> {
            match v {
                1 => Ok(Nav::Back),
                2 => Ok(Nav::Home),
                _ => Err(()),
            }
        }
    }

    #[derive(Clone, Copy)]
    enum Other {
        Back = 1,
    }

    impl From<Other> for i64 {
        fn from(o: Other) -> i64 {
            o as i64
        }
    }

    #[test]
    fn payload_does_not_affect_equality() {
        let a = Command::named("close").with_payload(1_u8);
        let b = Command::named("close");
        assert_eq!(a, b);
        assert_eq!(a.payload::<u8>(), Some(&1));
        assert_eq!(a.payload::<u16>(), None);
        assert_eq!(b.payload::<u8>(), None);
    }

    #[test]
    fn enum_identity_includes_the_enum_type() {
        let back = Command::from_enum(Nav::Back);
        assert!(back.is_enum(Nav::Back));
        assert!(!back.is_enum(Nav::Home));
        assert!(!back.is_enum(Other::Back));
        assert_ne!(back, Command::from_enum(Other::Back));
        assert_eq!(back.as_enum::<Nav>(), Some(Nav::Back));
    }

    #[test]
    fn kinds_never_compare_equal() {
        assert_ne!(Command::int(1), Command::from_enum(Nav::Back));
        assert_ne!(Command::named("1"), Command::int(1));
        assert!(Command::from("ok").is_named("ok"));
        assert_eq!(Command::int(7).name(), None);
    }
}

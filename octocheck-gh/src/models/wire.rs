//! Wire-token enumerations.
//!
//! GitHub encodes enumerations as fixed lowercase tokens whose spelling does
//! not follow the Rust member names (`InProgress` is `in_progress`). Each enum
//! is declared with an explicit member-to-token table and every conversion
//! (`as_str`, `FromStr`, `Display`, serde) is generated from that one table.
//!
//! Parsing an enum directly is strict. Response models hold their tokens in a
//! [`WireValue`] instead, so a value GitHub adds later decodes as
//! [`WireValue::Unknown`] rather than failing the whole response.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A token that does not belong to the target enumeration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value '{token}'")]
pub struct UnknownToken {
  pub kind: &'static str,
  pub token: String,
}

/// Implemented by every enum declared with `wire_enum!`
pub trait WireEnum: Copy + FromStr<Err = UnknownToken> {
  /// Enum name reported in [`UnknownToken`]
  const KIND: &'static str;

  fn token(self) -> &'static str;
}

/// A token read from a response, kept verbatim when it is not a known member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireValue<T> {
  Known(T),
  Unknown(String),
}

impl<T: WireEnum> WireValue<T> {
  /// The member, or `None` for a token this crate does not list
  pub fn known(&self) -> Option<T> {
    match self {
      Self::Known(value) => Some(*value),
      Self::Unknown(_) => None,
    }
  }

  /// Strict view of the token
  pub fn parse(&self) -> Result<T, UnknownToken> {
    match self {
      Self::Known(value) => Ok(*value),
      Self::Unknown(token) => Err(UnknownToken {
        kind: T::KIND,
        token: token.clone(),
      }),
    }
  }

  /// The token exactly as it appears on the wire
  pub fn as_str(&self) -> &str {
    match self {
      Self::Known(value) => value.token(),
      Self::Unknown(token) => token,
    }
  }

  pub fn is_unknown(&self) -> bool {
    matches!(self, Self::Unknown(_))
  }
}

impl<T> From<T> for WireValue<T> {
  fn from(value: T) -> Self {
    Self::Known(value)
  }
}

impl<T: WireEnum> fmt::Display for WireValue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl<T: WireEnum> Serialize for WireValue<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de, T: WireEnum> Deserialize<'de> for WireValue<T> {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let token = String::deserialize(deserializer)?;
    Ok(match token.parse::<T>() {
      Ok(value) => Self::Known(value),
      Err(_) => Self::Unknown(token),
    })
  }
}

macro_rules! wire_enum {
  (
    $(#[$meta:meta])*
    pub enum $name:ident {
      $( $(#[$vmeta:meta])* $variant:ident => $token:literal, )+
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum $name {
      $( $(#[$vmeta])* $variant, )+
    }

    impl $name {
      /// Every member, in declaration order
      pub const ALL: &'static [$name] = &[$($name::$variant,)+];

      /// The wire token for this member
      pub const fn as_str(self) -> &'static str {
        match self {
          $( $name::$variant => $token, )+
        }
      }
    }

    impl ::std::str::FromStr for $name {
      type Err = $crate::models::wire::UnknownToken;

      fn from_str(token: &str) -> ::std::result::Result<Self, Self::Err> {
        match token {
          $( $token => Ok($name::$variant), )+
          other => Err($crate::models::wire::UnknownToken {
            kind: stringify!($name),
            token: other.to_string(),
          }),
        }
      }
    }

    impl $crate::models::wire::WireEnum for $name {
      const KIND: &'static str = stringify!($name);

      fn token(self) -> &'static str {
        self.as_str()
      }
    }

    impl ::std::cmp::PartialEq<$name> for $crate::models::wire::WireValue<$name> {
      fn eq(&self, other: &$name) -> bool {
        matches!(self, $crate::models::wire::WireValue::Known(value) if value == other)
      }
    }

    impl ::std::fmt::Display for $name {
      fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl ::serde::Serialize for $name {
      fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
      }
    }

    impl<'de> ::serde::Deserialize<'de> for $name {
      fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
        let token = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
        token.parse().map_err(::serde::de::Error::custom)
      }
    }
  };
}

pub(crate) use wire_enum;

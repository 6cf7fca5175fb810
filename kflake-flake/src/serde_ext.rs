//! additional serde options for de/serializing a flake
//!
//! provides modules for converting a flake to its base 36 string if
//! something cannot handle working with 64 bit unsigned integers
//! (javascript).
//!
//! ```rust
//! use serde::{Serialize, Deserialize};
//! use kflake_flake::Flake;
//! use kflake_flake::serde_ext::string_id;
//!
//! #[derive(Serialize, Deserialize)]
//! pub struct MyStruct {
//!     #[serde(with = "string_id")]
//!     id: Flake,
//! }
//!
//! let my_struct = MyStruct {
//!     id: Flake::from_parts(1, 1, 1).unwrap(),
//! };
//!
//! let json_string = serde_json::to_string(&my_struct).unwrap();
//!
//! assert_eq!(json_string, "{\"id\":\"4zz0h\"}");
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::de;

use kflake_core::traits;

use crate::base36;

/// visitor for deserializing a base 36 string to a flake
pub struct StringVisitor<F> {
    phantom: PhantomData<F>
}

impl<'de, F> de::Visitor<'de> for StringVisitor<F>
where
    F: traits::Id<BaseType = u64> + From<u64>
{
    type Value = F;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "non empty base 36 string within the range of a u64")
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let Ok(num) = base36::decode(s) else {
            return Err(E::invalid_value(de::Unexpected::Str(s), &self));
        };

        Ok(F::from(num))
    }
}

/// visitor for deserializing an optional base 36 string to a flake
pub struct OptionStringVisitor<F> {
    phantom: PhantomData<F>
}

impl<'de, F> de::Visitor<'de> for OptionStringVisitor<F>
where
    F: traits::Id<BaseType = u64> + From<u64>
{
    type Value = Option<F>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "non empty base 36 string within the range of a u64")
    }

    fn visit_some<D>(self, d: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>
    {
        d.deserialize_str(StringVisitor {
            phantom: PhantomData
        }).map(Some)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error
    {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error
    {
        Ok(None)
    }
}

/// de/serializes a flake to a base 36 string
///
/// structured to be used in `#[serde(with = "string_id")]`
pub mod string_id {
    use std::marker::PhantomData;

    use serde::{ser, de};
    use kflake_core::traits;

    use crate::base36;

    use super::StringVisitor;

    /// serializes a given flake to a string
    pub fn serialize<F, S>(flake: &F, serializer: S) -> Result<S::Ok, S::Error>
    where
        F: traits::Id<BaseType = u64>,
        S: ser::Serializer
    {
        let id_str = base36::encode(flake.id());

        serializer.serialize_str(id_str.as_str())
    }

    /// deserializes a given string to a flake
    pub fn deserialize<'de, F, D>(deserializer: D) -> Result<F, D::Error>
    where
        F: traits::Id<BaseType = u64> + From<u64>,
        D: de::Deserializer<'de>
    {
        deserializer.deserialize_str(StringVisitor {
            phantom: PhantomData
        })
    }

    #[cfg(test)]
    mod test {
        use serde::{Serialize, Deserialize};
        use serde_json;

        use crate::Flake;
        use crate::serde_ext::string_id;

        #[derive(Serialize, Deserialize)]
        struct FlakeJson {
            #[serde(with = "string_id")]
            id: Flake,
        }

        #[test]
        fn to_string() {
            let obj = FlakeJson { id: Flake::from_parts(1, 1, 1).unwrap() };

            match serde_json::to_string(&obj) {
                Ok(json_string) => {
                    assert_eq!(json_string.as_str(), "{\"id\":\"4zz0h\"}", "invalid json string");
                },
                Err(err) => {
                    panic!("failed to create json string. {:#?}", err);
                }
            }
        }

        #[test]
        fn from_string() {
            match serde_json::from_str::<FlakeJson>("{\"id\":\"4zz0h\"}") {
                Ok(obj) => {
                    assert_eq!(obj.id, Flake::from_parts(1, 1, 1).unwrap(), "invalid parsed id");
                },
                Err(err) => {
                    panic!("failed to parse json string. {:#?}", err);
                }
            }
        }

        #[test]
        fn rejects_invalid_string() {
            assert!(serde_json::from_str::<FlakeJson>("{\"id\":\"not an id\"}").is_err());
            assert!(serde_json::from_str::<FlakeJson>("{\"id\":8396801}").is_err());
        }
    }
}

/// de/serializes an optional flake to a base 36 string
///
/// structured to be used in `#[serde(with = "option_string_id")]`
pub mod option_string_id {
    use std::marker::PhantomData;

    use serde::{ser, de};
    use kflake_core::traits;

    use crate::base36;

    use super::OptionStringVisitor;

    /// serializes a given flake to a string
    pub fn serialize<F, S>(flake: &Option<F>, serializer: S) -> Result<S::Ok, S::Error>
    where
        F: traits::Id<BaseType = u64>,
        S: ser::Serializer
    {
        match flake {
            Some(ref v) => {
                let id_str = base36::encode(v.id());

                serializer.serialize_some(id_str.as_str())
            },
            None => serializer.serialize_none()
        }
    }

    /// deserializes a given string to a flake
    pub fn deserialize<'de, F, D>(deserializer: D) -> Result<Option<F>, D::Error>
    where
        F: traits::Id<BaseType = u64> + From<u64>,
        D: de::Deserializer<'de>
    {
        deserializer.deserialize_option(OptionStringVisitor {
            phantom: PhantomData
        })
    }

    #[cfg(test)]
    mod test {
        use serde::{Serialize, Deserialize};
        use serde_json;

        use crate::Flake;
        use crate::serde_ext::option_string_id;

        #[derive(Serialize, Deserialize)]
        struct OptionJson {
            #[serde(with = "option_string_id")]
            id: Option<Flake>,
        }

        #[test]
        fn some_and_none() {
            let some = OptionJson { id: Some(Flake::from(36)) };
            let none = OptionJson { id: None };

            assert_eq!(serde_json::to_string(&some).unwrap(), "{\"id\":\"10\"}");
            assert_eq!(serde_json::to_string(&none).unwrap(), "{\"id\":null}");

            let parsed: OptionJson = serde_json::from_str("{\"id\":\"10\"}").unwrap();
            assert_eq!(parsed.id, Some(Flake::from(36)));

            let parsed: OptionJson = serde_json::from_str("{\"id\":null}").unwrap();
            assert_eq!(parsed.id, None);
        }
    }
}

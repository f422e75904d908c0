use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use diesel::deserialize::{self, FromSql, Queryable};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Codec, Error};

pub trait TypeMarker: fmt::Debug {
    fn name() -> &'static str;
}

/// A generic type-safe entity ID field (a wrapped u64).
///
/// When serialized with Serde, the number is run through the global link ID
/// [`Codec`] and rendered as a URL safe token. Deserialization decodes the token
/// back to the integer and rejects tokens that don't decode exactly.
///
/// Traits are also provided for Diesel compatibility with Postgres BigInt fields, so
/// the database keeps plain sequential integers. Use `Option<Field<T>>` for nullable
/// columns.
///
/// # Examples
///
/// ```
/// use serde::Serialize;
///
/// #[derive(Clone, Copy, Debug)]
/// pub struct PostIdMarker;
/// impl urlid_rs::TypeMarker for PostIdMarker {
///     fn name() -> &'static str { "post" }
/// }
///
/// type PostId = urlid_rs::Field<PostIdMarker>;
///
/// #[derive(Serialize)]
/// struct Post {
///     pub id: PostId,
/// }
///
/// let post = Post { id: PostId::new(12345) };
/// let post_str = serde_json::to_string(&post).unwrap();
/// assert_eq!(post_str, "{\"id\":\"yNQRDJ52kpKxxX\"}");
/// ```
#[derive(AsExpression, Debug)]
#[diesel(sql_type = BigInt)]
pub struct Field<T: TypeMarker> {
    id: u64,
    _marker: PhantomData<T>,
}

impl<T: TypeMarker> Field<T> {
    pub const fn new(id: u64) -> Self {
        Field {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the raw ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Encodes the ID into its public token.
    pub fn encode(self) -> String {
        Codec::global().encode(self.id)
    }

    /// Decodes a public token.
    pub fn decode(token: &str) -> Result<Self, Error> {
        Codec::global().decode(token).map(Field::new)
    }
}

// Manual impls so markers need not derive these themselves.
impl<T: TypeMarker> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: TypeMarker> Copy for Field<T> {}

impl<T: TypeMarker> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: TypeMarker> Eq for Field<T> {}

impl<T: TypeMarker> Hash for Field<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: TypeMarker> From<u64> for Field<T> {
    fn from(id: u64) -> Self {
        Field::new(id)
    }
}

impl<T: TypeMarker> From<Field<T>> for u64 {
    /// Returns the raw `u64` value.
    fn from(field: Field<T>) -> Self {
        field.id
    }
}

impl<T: TypeMarker> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl<T: TypeMarker> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de, T: TypeMarker> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        Field::decode(&encoded).map_err(|e| {
            serde::de::Error::custom(format_args!("invalid {} id: {}", T::name(), e))
        })
    }
}

impl<T: TypeMarker> ToSql<BigInt, Pg> for Field<T> {
    fn to_sql(&self, out: &mut Output<'_, '_, Pg>) -> serialize::Result {
        <i64 as ToSql<BigInt, Pg>>::to_sql(&(self.id as i64), &mut out.reborrow())
    }
}

impl<T: TypeMarker> FromSql<BigInt, Pg> for Field<T> {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let id = <i64 as FromSql<BigInt, Pg>>::from_sql(bytes)?;
        Ok(Field::new(id as u64))
    }
}

impl<T> Queryable<BigInt, Pg> for Field<T>
where
    T: TypeMarker,
{
    type Row = <i64 as Queryable<BigInt, Pg>>::Row;

    fn build(row: Self::Row) -> deserialize::Result<Self> {
        let id = i64::build(row)?;
        Ok(Field::new(id as u64))
    }
}

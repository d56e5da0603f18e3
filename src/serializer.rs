//! Converters for preference fields whose type has no native storage.
//!
//! A field declared with `#[object_property(serializer = ...)]` is stored as
//! the string its serializer produces. The serializer must be a unit struct or
//! implement [`Default`], and implement one of the two contracts below for
//! exactly the field's type.

/// Strict contract: every value has a string form.
///
/// ```
/// use arctic_tern::Serializer;
///
/// struct Celsius(f64);
///
/// #[derive(Default)]
/// struct CelsiusSerializer;
///
/// impl Serializer<Celsius> for CelsiusSerializer {
///     fn serialize(&self, value: &Celsius) -> String {
///         value.0.to_string()
///     }
///
///     fn deserialize(&self, encoded: &str) -> anyhow::Result<Celsius> {
///         Ok(Celsius(encoded.parse()?))
///     }
/// }
///
/// let encoded = CelsiusSerializer.serialize(&Celsius(21.5));
/// assert_eq!(CelsiusSerializer.deserialize(&encoded).unwrap().0, 21.5);
/// ```
pub trait Serializer<T> {
    fn serialize(&self, value: &T) -> String;

    fn deserialize(&self, encoded: &str) -> anyhow::Result<T>;
}

/// Nullable contract: a value may encode to no entry at all, in which case the
/// key is removed, and decoding receives `None` for an absent key.
pub trait NullableSerializer<T> {
    fn serialize(&self, value: &T) -> Option<String>;

    fn deserialize(&self, encoded: Option<&str>) -> anyhow::Result<T>;
}

//! Key canonicalization
//!
//! Every key is stored in its string form. Two keys that render to the same
//! string address the same entry, so `1u32` and `"1"` are interchangeable.
//!
//! Floats render the way JavaScript's `String(number)` does: `-0.0` is `"0"`,
//! infinities are `"Infinity"`/`"-Infinity"`, and magnitudes at or above
//! `1e21` or below `1e-6` switch to exponent form with an explicit sign
//! (`"1e+21"`, `"1.5e-7"`). So `2.0f64` and `2u8` share the key `"2"`.

use std::borrow::Cow;

/// Conversion into the canonical string form of a key
pub trait ToKey {
    /// Render the key, borrowing when it already is a string
    fn to_key(&self) -> Cow<'_, str>;
}

impl ToKey for str {
    fn to_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl ToKey for String {
    fn to_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl ToKey for Box<str> {
    fn to_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl ToKey for Cow<'_, str> {
    fn to_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_ref())
    }
}

impl<T: ToKey + ?Sized> ToKey for &T {
    fn to_key(&self) -> Cow<'_, str> {
        (**self).to_key()
    }
}

impl<T: ToKey + ?Sized> ToKey for &mut T {
    fn to_key(&self) -> Cow<'_, str> {
        (**self).to_key()
    }
}

macro_rules! display_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToKey for $ty {
                fn to_key(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

display_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, char, bool);

macro_rules! float_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToKey for $ty {
                fn to_key(&self) -> Cow<'_, str> {
                    let value = *self;
                    let rendered = if value.is_nan() {
                        "NaN".to_string()
                    } else if value.is_infinite() {
                        let sign = if value > 0.0 { "" } else { "-" };
                        format!("{}Infinity", sign)
                    } else if value == 0.0 {
                        "0".to_string()
                    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
                        exponent_form(&format!("{:e}", value))
                    } else {
                        value.to_string()
                    };
                    Cow::Owned(rendered)
                }
            }
        )*
    };
}

float_key!(f32, f64);

/// `1e21` -> `1e+21`; negative exponents already carry their sign
fn exponent_form(rendered: &str) -> String {
    match rendered.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => rendered.to_string(),
    }
}

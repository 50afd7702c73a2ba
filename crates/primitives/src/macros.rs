/// Generates the common impls for a fixed-size byte buffer newtype a la
/// `struct Foo([u8; N]);`.
macro_rules! impl_buf_common {
    ($name:ident, $len:expr) => {
        impl $name {
            /// The length of the buffer in bytes.
            pub const LEN: usize = $len;

            /// Creates a new buffer from raw bytes.
            pub const fn new(data: [u8; $len]) -> Self {
                Self(data)
            }

            /// The "zero" buffer.
            pub const fn zero() -> Self {
                Self([0; $len])
            }

            /// Checks if every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            /// Returns the underlying bytes as a slice.
            pub fn as_slice(&self) -> &[u8] {
                &self.0
            }

            /// Returns the underlying byte array.
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl ::std::convert::From<[u8; $len]> for $name {
            fn from(value: [u8; $len]) -> Self {
                Self(value)
            }
        }

        impl ::std::convert::From<$name> for [u8; $len] {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl ::std::convert::AsRef<[u8; $len]> for $name {
            fn as_ref(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl<'a> ::std::convert::TryFrom<&'a [u8]> for $name {
            type Error = usize;

            fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
                let arr: [u8; $len] = value.try_into().map_err(|_| value.len())?;
                Ok(Self(arr))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                let mut buf = [0u8; $len * 2];
                ::hex::encode_to_slice(self.0, &mut buf).expect("buf: encode hex");
                // SAFETY: hex output is always valid UTF-8
                f.write_str(unsafe { ::std::str::from_utf8_unchecked(&buf) })
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl<'a> ::arbitrary::Arbitrary<'a> for $name {
            fn arbitrary(u: &mut ::arbitrary::Unstructured<'a>) -> ::arbitrary::Result<Self> {
                Ok(Self(<[u8; $len]>::arbitrary(u)?))
            }
        }
    };
}

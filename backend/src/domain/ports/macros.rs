//! `define_port_error!`: thiserror enums with snake_case constructors.
//!
//! Each variant `Foo { message: String }` gains `fn foo(message: impl Into<String>)`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor generation for unit, single-field and multi-field variants.
    define_port_error! {
        pub enum SamplePortError {
            Gone => "record is gone",
            Connection { message: String } => "connection failed: {message}",
            Retry { attempts: u32 } => "gave up after {attempts} attempts",
            Timeout { message: String, millis: u64 } => "timed out: {message} after {millis}ms",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SamplePortError::gone(), SamplePortError::Gone);
        assert_eq!(SamplePortError::gone().to_string(), "record is gone");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SamplePortError::connection("refused");
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        assert_eq!(
            SamplePortError::retry(3_u32).to_string(),
            "gave up after 3 attempts"
        );
    }

    #[test]
    fn mixed_fields_are_supported() {
        let err = SamplePortError::timeout("store", 250_u64);
        assert_eq!(err.to_string(), "timed out: store after 250ms");
    }
}

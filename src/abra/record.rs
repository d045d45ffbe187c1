//! Field tables for the wide Abra records.
//!
//! [`abra_record!`] takes one line per field (`column: Kind = "xmlTag"`) and
//! generates the struct, its [`FieldSpec`] table, the XML extraction and, with
//! the `store` feature, the SQL parameter list and row mapping. Column order
//! is declaration order everywhere.

/// Coercion applied to a field, which also fixes its Rust and SQL types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `Option<String>`, `TEXT`
    Text,
    /// `Option<f64>`, `REAL`
    Float,
    /// `bool`, `INTEGER NOT NULL DEFAULT 0`
    Bool,
    /// `Option<String>` in canonical date form, `TEXT`
    Date,
}

impl FieldKind {
    /// Column definition suffix used in `CREATE TABLE`.
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Text | Self::Date => "TEXT",
            Self::Float => "REAL",
            Self::Bool => "INTEGER NOT NULL DEFAULT 0",
        }
    }
}

/// One generated field: database column, source tag and coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub column: &'static str,
    pub tag: &'static str,
    pub kind: FieldKind,
}

macro_rules! abra_record {
    (@ty Text) => { Option<String> };
    (@ty Float) => { Option<f64> };
    (@ty Bool) => { bool };
    (@ty Date) => { Option<String> };

    (@read Text, $tag:literal, $el:ident, $co:ident) => { $crate::core::get_text($tag, $el) };
    (@read Float, $tag:literal, $el:ident, $co:ident) => { $crate::core::get_float($tag, $el) };
    (@read Bool, $tag:literal, $el:ident, $co:ident) => { $crate::core::get_bool($tag, $el) };
    (@read Date, $tag:literal, $el:ident, $co:ident) => { $co.get_date($tag, $el)? };

    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $field:ident : $kind:ident = $tag:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $name {
            $( pub $field: abra_record!(@ty $kind), )*
        }

        impl $name {
            /// Column/tag/coercion table in declaration order.
            pub const FIELDS: &'static [$crate::abra::FieldSpec] = &[
                $( $crate::abra::FieldSpec {
                    column: stringify!($field),
                    tag: $tag,
                    kind: $crate::abra::FieldKind::$kind,
                }, )*
            ];

            /// Extract every field from the direct children of `el`.
            pub fn read(
                el: &$crate::core::Element,
                co: &$crate::core::Coercion,
            ) -> $crate::core::Result<Self> {
                Ok(Self {
                    $( $field: abra_record!(@read $kind, $tag, el, co), )*
                })
            }

            /// Field values as SQL parameters, in [`Self::FIELDS`] order.
            #[cfg(feature = "store")]
            pub fn sql_params(&self) -> Vec<&dyn ::rusqlite::ToSql> {
                vec![ $( &self.$field as &dyn ::rusqlite::ToSql, )* ]
            }

            /// Rebuild from a row whose columns `offset..` follow [`Self::FIELDS`].
            #[cfg(feature = "store")]
            pub fn from_row(row: &::rusqlite::Row<'_>, offset: usize) -> ::rusqlite::Result<Self> {
                let mut idx = offset;
                let mut next = || {
                    let i = idx;
                    idx += 1;
                    i
                };
                Ok(Self {
                    $( $field: row.get(next())?, )*
                })
            }
        }
    };
}

pub(crate) use abra_record;

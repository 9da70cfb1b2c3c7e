//! Locale-aware message formatting.
//!
//! `polyglot` stores templates keyed by locale and dot-separated path,
//! renders them with positional or named arguments, and falls back across
//! locales and path prefixes when a translation is missing. Template
//! expressions pipe values through filters (`{0 | plural (one item) 2 ({0}
//! items)}`) and named formatters; `$path` references inline other messages
//! when the pack is built.
//!
//! # Example
//!
//! ```
//! use polyglot::{Locale, MessagePack, args};
//!
//! let pack = MessagePack::builder()
//!     .add_message(Locale::new("en"), "greeting", "Hello {0}!")
//!     .add_message(Locale::new("pl"), "greeting", "Cześć {0}!")
//!     .build()
//!     .unwrap();
//!
//! let en = pack.render(&Locale::new("en"), "greeting", &args!["World"]).unwrap();
//! assert_eq!(en, "Hello World!");
//!
//! // pl-PL generalizes to pl, the closest stored translation.
//! let pl = pack.render(&Locale::parse("pl-PL").unwrap(), "greeting", &args!["świecie"]).unwrap();
//! assert_eq!(pl, "Cześć świecie!");
//! ```

pub mod args;
pub mod cache;
pub mod fallback;
pub mod filter;
pub mod format;
pub mod pack;
pub mod parser;
mod reference;
pub mod render;
pub mod types;

pub use args::{ArgTransformer, default_transformers};
pub use filter::{Filter, FilterRegistry};
pub use format::{FormatError, FormatterProvider, LocaleTemplates, ValueFormatter};
pub use pack::{
    BuildError, MessageBundle, MessagePack, MessagePackBuilder, Messages, ReloadableMessagePack,
    UnresolvedMessagePolicy,
};
pub use parser::ParseError;
pub use render::{Expression, FilterContext, RenderError};
pub use types::{Currency, Key, Locale, Money, Path, Value, ValueKind};

/// Creates a `Vec<Value>` of positional arguments.
///
/// Values are converted via `Into<Value>`, so integers, floats, strings,
/// dates and `Money` values can be passed directly.
///
/// # Example
///
/// ```
/// use polyglot::args;
///
/// let args = args!["World", 3];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    [] => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    [ $($value:expr),+ $(,)? ] => {
        ::std::vec![ $( ::std::convert::Into::<$crate::Value>::into($value) ),+ ]
    };
}

/// Creates a `HashMap<String, Value>` of named arguments.
///
/// # Example
///
/// ```
/// use polyglot::{Value, named_args};
///
/// let args = named_args! { "count" => 3, "name" => "Alice" };
/// assert_eq!(args["count"], Value::Int(3));
/// ```
#[macro_export]
macro_rules! named_args {
    {} => {
        ::std::collections::HashMap::<::std::string::String, $crate::Value>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<::std::string::String, $crate::Value>::new();
            $(
                map.insert(
                    ::std::string::ToString::to_string(&$key),
                    ::std::convert::Into::<$crate::Value>::into($value),
                );
            )+
            map
        }
    };
}

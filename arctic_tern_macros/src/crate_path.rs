//! Path of the `arctic_tern` runtime as seen from the consuming crate.
//!
//! Generated code names runtime items by absolute path, so it keeps working
//! when the dependency is renamed in `Cargo.toml`. Inside `arctic_tern`
//! itself the crate re-exports itself under its own name.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::Span;
use syn::{Ident, Path, parse_quote};

pub(crate) fn arctic_tern_path() -> Path {
    match crate_name("arctic_tern") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            parse_quote!(::#ident)
        }
        Ok(FoundCrate::Itself) | Err(_) => parse_quote!(::arctic_tern),
    }
}

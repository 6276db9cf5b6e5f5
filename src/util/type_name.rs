//! Readable type names for identities and error kinds.

/// Strip the module path and generic parameters from a fully qualified type name.
///
/// `my_app::worker::Consumer<alloc::string::String>` becomes `Consumer`.
pub fn short_type_name(path: &str) -> &str {
    let base = match path.find('<') {
        Some(idx) => &path[..idx],
        None => path,
    };
    base.rsplit("::").next().unwrap_or(base)
}

/// Short type name of `T`.
pub fn type_name_of<T: ?Sized>() -> &'static str {
    short_type_name(std::any::type_name::<T>())
}

//! The well-known type dictionary.
//!
//! Standard-width integers, pointer-sized integers and wide characters get
//! fixed Rust spellings instead of going through the generic conversion
//! arms, which also produces more idiomatic results for the `std::` typedef
//! forms.

/// Looks up the canonical Rust spelling for a well-known C++ type. The key
/// is the canonical unqualified type spelling produced by the AST.
pub fn well_known_type(spelling: &str) -> Option<&'static str> {
    let mapped = match spelling {
        "ptrdiff_t" | "std::ptrdiff_t" => "isize",
        "intptr_t" | "std::intptr_t" => "isize",
        "size_t" | "std::size_t" => "usize",
        "uintptr_t" | "std::uintptr_t" => "usize",

        "int8_t" | "std::int8_t" => "i8",
        "int16_t" | "std::int16_t" => "i16",
        "int32_t" | "std::int32_t" => "i32",
        "int64_t" | "std::int64_t" => "i64",

        "uint8_t" | "std::uint8_t" => "u8",
        "uint16_t" | "std::uint16_t" => "u16",
        "uint32_t" | "std::uint32_t" => "u32",
        "uint64_t" | "std::uint64_t" => "u64",

        "char16_t" => "u16",
        "char32_t" => "u32",
        "wchar_t" => "i32",
        _ => return None,
    };
    Some(mapped)
}

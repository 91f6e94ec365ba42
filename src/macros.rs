//! Private macros for dispatching over volume element types.

/// Evaluate `$body` with the type alias `$t` bound to the Rust element type
/// matching a runtime `DataType`.
macro_rules! with_element_type {
    ($dtype:expr, $t:ident => $body:expr) => {
        match $dtype {
            $crate::volume::DataType::Uint8 => { type $t = u8; $body }
            $crate::volume::DataType::Uint16 => { type $t = u16; $body }
            $crate::volume::DataType::Uint32 => { type $t = u32; $body }
            $crate::volume::DataType::Uint64 => { type $t = u64; $body }
            $crate::volume::DataType::Int8 => { type $t = i8; $body }
            $crate::volume::DataType::Int16 => { type $t = i16; $body }
            $crate::volume::DataType::Int32 => { type $t = i32; $body }
            $crate::volume::DataType::Int64 => { type $t = i64; $body }
            $crate::volume::DataType::Float32 => { type $t = f32; $body }
            $crate::volume::DataType::Float64 => { type $t = f64; $body }
        }
    };
}

/// Evaluate `$body` with `$a` bound to the array inside any `Volume` variant.
macro_rules! each_variant {
    ($volume:expr, $a:ident => $body:expr) => {
        match $volume {
            $crate::volume::Volume::Uint8($a) => $body,
            $crate::volume::Volume::Uint16($a) => $body,
            $crate::volume::Volume::Uint32($a) => $body,
            $crate::volume::Volume::Uint64($a) => $body,
            $crate::volume::Volume::Int8($a) => $body,
            $crate::volume::Volume::Int16($a) => $body,
            $crate::volume::Volume::Int32($a) => $body,
            $crate::volume::Volume::Int64($a) => $body,
            $crate::volume::Volume::Float32($a) => $body,
            $crate::volume::Volume::Float64($a) => $body,
        }
    };
}

/// Like `each_variant!`, but wraps the array produced by `$body` back into
/// the same `Volume` variant.
macro_rules! map_variant {
    ($volume:expr, $a:ident => $body:expr) => {
        match $volume {
            $crate::volume::Volume::Uint8($a) => $crate::volume::Volume::Uint8($body),
            $crate::volume::Volume::Uint16($a) => $crate::volume::Volume::Uint16($body),
            $crate::volume::Volume::Uint32($a) => $crate::volume::Volume::Uint32($body),
            $crate::volume::Volume::Uint64($a) => $crate::volume::Volume::Uint64($body),
            $crate::volume::Volume::Int8($a) => $crate::volume::Volume::Int8($body),
            $crate::volume::Volume::Int16($a) => $crate::volume::Volume::Int16($body),
            $crate::volume::Volume::Int32($a) => $crate::volume::Volume::Int32($body),
            $crate::volume::Volume::Int64($a) => $crate::volume::Volume::Int64($body),
            $crate::volume::Volume::Float32($a) => $crate::volume::Volume::Float32($body),
            $crate::volume::Volume::Float64($a) => $crate::volume::Volume::Float64($body),
        }
    };
}

use std::{
    any::{type_name, Any, TypeId},
    fmt::Debug,
    sync::Arc,
};

/// The standard failure type creators report through
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Anything stored in the container needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// A constructed value held by the registry
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    pub instance: Arc<dyn Any + Send + Sync + 'static>,
}
impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.info.type_name).finish()
    }
}

impl Instance {
    pub fn new<ExistingInstance: Injectable>(instance: ExistingInstance) -> Self {
        Instance {
            info: TypeInfo::of::<ExistingInstance>(),
            instance: Arc::new(instance),
        }
    }

    /// Returns the stored value, or the name of the actually stored type
    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.instance.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.info.type_name),
        }
    }

    pub fn downcast_ref<T: Injectable>(&self) -> Option<&T> {
        self.instance.downcast_ref()
    }
}

/// Rough shape of a type, as far as the container cares about it
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum TypeKind {
    /// Named user type - structs, enums and their generic instantiations
    Struct,
    /// `&T`, `Box<T>`, `Arc<T>`, `Rc<T>` and raw pointers
    Reference,
    /// `dyn Trait`
    Interface,
    /// Primitives, `str` and `String`
    Builtin,
    /// Slices, arrays and the std collections, `Option` and `Result` included
    Collection,
    /// Function pointers and closures
    Func,
    /// `()`
    Unit,
    /// The failure indicator slot of a fallible creator
    Failure,
}

/// Type Name, Type Id and Kind
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
    pub kind: TypeKind,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        let type_name = type_name::<T>();
        TypeInfo {
            type_name,
            type_id: TypeId::of::<T>(),
            kind: classify(type_name),
        }
    }

    /// Describes the failure indicator every fallible creator declares as its second output
    pub fn failure() -> TypeInfo {
        TypeInfo {
            kind: TypeKind::Failure,
            ..TypeInfo::of::<DynError>()
        }
    }

    /// Whether a value of this type may be registered
    pub fn is_registrable(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Struct | TypeKind::Reference | TypeKind::Interface
        )
    }

    /// Registry key of this type
    ///
    /// The type's own name without module paths. References resolve to the name of the type they
    /// point to. Anonymous types (tuples, closures, collections) have no key.
    pub fn key(&self) -> Option<String> {
        match self.kind {
            TypeKind::Reference => pointee(self.type_name).and_then(own_name),
            TypeKind::Failure => None,
            _ => own_name(self.type_name),
        }
    }
}

const SMART_POINTERS: &[&str] = &[
    "alloc::boxed::Box",
    "alloc::sync::Arc",
    "alloc::rc::Rc",
    "std::boxed::Box",
    "std::sync::Arc",
    "std::rc::Rc",
];

const BUILTINS: &[&str] = &[
    "bool", "char", "str", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
    "u128", "usize", "f32", "f64", "alloc::string::String", "std::string::String",
];

const COLLECTION_PATHS: &[&str] = &[
    "alloc::vec::",
    "alloc::collections::",
    "std::vec::",
    "std::collections::",
    "core::option::",
    "core::result::",
    "std::option::",
    "std::result::",
];

fn classify(type_name: &str) -> TypeKind {
    let name = type_name.trim();

    if name == "()" {
        return TypeKind::Unit;
    }
    if name.starts_with('&') || name.starts_with("*const ") || name.starts_with("*mut ") {
        return TypeKind::Reference;
    }
    if name.starts_with("dyn ") {
        return TypeKind::Interface;
    }
    // Tuples are structs without a name
    if name.starts_with('(') {
        return TypeKind::Struct;
    }
    if name.starts_with('[') {
        return TypeKind::Collection;
    }
    if name.starts_with("fn(")
        || name.starts_with("unsafe ")
        || name.starts_with("extern ")
        || name.contains("{{closure}}")
    {
        return TypeKind::Func;
    }

    let base = base_path(name);
    if SMART_POINTERS.contains(&base) {
        TypeKind::Reference
    } else if BUILTINS.contains(&base) {
        TypeKind::Builtin
    } else if COLLECTION_PATHS.iter().any(|path| base.starts_with(path)) {
        TypeKind::Collection
    } else {
        TypeKind::Struct
    }
}

/// Name of a type as it would be written in its own module
fn own_name(type_name: &str) -> Option<String> {
    let name = type_name.trim();
    match classify(name) {
        TypeKind::Struct if name.starts_with('(') => None,
        TypeKind::Struct | TypeKind::Builtin => Some(strip_paths(name)),
        TypeKind::Interface => {
            let bounds = name.trim_start_matches("dyn ");
            Some(strip_paths(first_top_level(bounds, '+').trim()))
        }
        _ => None,
    }
}

/// The type a reference type points to
fn pointee(type_name: &str) -> Option<&str> {
    let name = type_name.trim();
    for prefix in ["&mut ", "&", "*const ", "*mut "] {
        if let Some(rest) = name.strip_prefix(prefix) {
            return Some(rest.trim());
        }
    }

    let open = name.find('<')?;
    let close = name.rfind('>')?;
    if close <= open {
        return None;
    }
    Some(first_top_level(&name[open + 1..close], ',').trim())
}

/// The path of a type without its generic arguments
fn base_path(type_name: &str) -> &str {
    match type_name.find('<') {
        Some(open) => &type_name[..open],
        None => type_name,
    }
}

/// Everything before the first `separator` that is not nested in brackets
fn first_top_level(s: &str, separator: char) -> &str {
    let mut depth = 0usize;
    for (idx, c) in s.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => return &s[..idx],
            _ => {}
        }
    }
    s
}

/// Turns `app::Wrapper<app::Inner>` into `Wrapper<Inner>`
fn strip_paths(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len());
    let mut segment = String::new();
    let mut chars = type_name.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            segment.clear();
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            segment.push(c);
            continue;
        }
        out.push_str(&segment);
        segment.clear();
        out.push(c);
    }
    out.push_str(&segment);

    out
}

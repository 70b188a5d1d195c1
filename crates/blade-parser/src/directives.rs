//! Directive registry and block-pairing grammar.
//!
//! The registry decides which `@word` occurrences count as directives at
//! all; the grammar table describes how known block directives pair with
//! their intermediate and closing directives.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// The pairing shape of a block directive family.
#[derive(Debug, Clone, Copy)]
pub struct BlockSpec {
    /// The opening directive name.
    pub opener: &'static str,
    /// Directives that start a new branch inside the block.
    pub intermediates: &'static [&'static str],
    /// Directives that close the block.
    pub closers: &'static [&'static str],
}

/// Pairing grammar for the built-in block directives.
///
/// `empty` appears both as the `forelse` intermediate and as the `@empty`
/// opener; the tree builder resolves the conflict by checking the innermost
/// open block's intermediates first.
pub const BLOCK_SPECS: &[BlockSpec] = &[
    BlockSpec { opener: "if", intermediates: &["elseif", "else"], closers: &["endif"] },
    BlockSpec { opener: "unless", intermediates: &["else"], closers: &["endunless"] },
    BlockSpec { opener: "foreach", intermediates: &[], closers: &["endforeach"] },
    BlockSpec { opener: "forelse", intermediates: &["empty"], closers: &["endforelse"] },
    BlockSpec { opener: "for", intermediates: &[], closers: &["endfor"] },
    BlockSpec { opener: "while", intermediates: &[], closers: &["endwhile"] },
    BlockSpec {
        opener: "switch",
        intermediates: &["case", "break", "default"],
        closers: &["endswitch"],
    },
    BlockSpec {
        opener: "section",
        intermediates: &[],
        closers: &["endsection", "show", "stop", "overwrite", "append"],
    },
    BlockSpec { opener: "push", intermediates: &[], closers: &["endpush"] },
    BlockSpec { opener: "pushonce", intermediates: &[], closers: &["endpushonce"] },
    BlockSpec { opener: "prepend", intermediates: &[], closers: &["endprepend"] },
    BlockSpec { opener: "once", intermediates: &[], closers: &["endonce"] },
    BlockSpec { opener: "isset", intermediates: &["else"], closers: &["endisset"] },
    BlockSpec { opener: "empty", intermediates: &[], closers: &["endempty"] },
    BlockSpec { opener: "auth", intermediates: &["else"], closers: &["endauth"] },
    BlockSpec { opener: "guest", intermediates: &["else"], closers: &["endguest"] },
    BlockSpec { opener: "can", intermediates: &["elsecan", "else"], closers: &["endcan"] },
    BlockSpec {
        opener: "cannot",
        intermediates: &["elsecannot", "else"],
        closers: &["endcannot"],
    },
    BlockSpec { opener: "canany", intermediates: &["elsecanany", "else"], closers: &["endcanany"] },
    BlockSpec { opener: "env", intermediates: &[], closers: &["endenv"] },
    BlockSpec { opener: "production", intermediates: &[], closers: &["endproduction"] },
    BlockSpec { opener: "hassection", intermediates: &["else"], closers: &["endhassection"] },
    BlockSpec {
        opener: "sectionmissing",
        intermediates: &["else"],
        closers: &["endsectionmissing"],
    },
    BlockSpec { opener: "error", intermediates: &["else"], closers: &["enderror"] },
    BlockSpec { opener: "component", intermediates: &[], closers: &["endcomponent"] },
    BlockSpec { opener: "slot", intermediates: &[], closers: &["endslot"] },
    BlockSpec { opener: "fragment", intermediates: &[], closers: &["endfragment"] },
    BlockSpec { opener: "session", intermediates: &[], closers: &["endsession"] },
];

/// Looks up the block spec for an opener name (already lowercased).
pub fn block_spec(opener: &str) -> Option<&'static BlockSpec> {
    BLOCK_SPECS.iter().find(|s| s.opener == opener)
}

/// Non-block directive names known out of the box.
const SIMPLE_DIRECTIVES: &[&str] = &[
    "extends", "include", "includeif", "includewhen", "includeunless", "includefirst",
    "each", "yield", "parent", "csrf", "method", "inject", "json", "js", "dd", "dump",
    "lang", "choice", "vite", "viteReactRefresh", "stack", "aware", "props", "use",
    "class", "style", "checked", "selected", "disabled", "readonly", "required",
    "continue", "break", "livewire", "livewireStyles", "livewireScripts", "entangle",
    "this", "elseif", "else", "endif", "endunless", "endforeach", "empty",
    "endforelse", "endfor", "endwhile", "case", "default", "endswitch", "endsection",
    "show", "stop", "overwrite", "append", "endpush", "endpushonce", "endprepend",
    "endonce", "endisset", "endempty", "endauth", "endguest", "elsecan", "endcan",
    "elsecannot", "endcannot", "elsecanany", "endcanany", "endenv", "endproduction",
    "endhassection", "endsectionmissing", "enderror", "endcomponent", "endslot",
    "endfragment", "endsession", "php", "endphp", "verbatim", "endverbatim",
];

/// A registry of known directive names.
///
/// Lookups are case-insensitive; registration preserves the original
/// spelling and records a monotonically increasing insertion index so
/// callers can recover registration order.
#[derive(Debug, Clone)]
pub struct DirectiveRegistry {
    entries: FxHashMap<SmolStr, DirectiveEntry>,
    accept_all: bool,
    next_index: u32,
}

/// A registered directive.
#[derive(Debug, Clone)]
pub struct DirectiveEntry {
    /// The name as originally registered.
    pub name: SmolStr,
    /// Position in registration order.
    pub insertion_index: u32,
}

impl DirectiveRegistry {
    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self {
            entries: FxHashMap::default(),
            accept_all: false,
            next_index: 0,
        }
    }

    /// Creates a registry preloaded with the built-in directive names.
    pub fn with_core_directives() -> Self {
        let mut registry = Self::empty();
        for spec in BLOCK_SPECS {
            registry.register(spec.opener);
            for name in spec.intermediates {
                registry.register(name);
            }
            for name in spec.closers {
                registry.register(name);
            }
        }
        for name in SIMPLE_DIRECTIVES {
            registry.register(name);
        }
        registry
    }

    /// Creates a registry that treats every `@word` as a directive.
    ///
    /// Used to discover custom directives that were never registered.
    pub fn accept_all() -> Self {
        let mut registry = Self::with_core_directives();
        registry.accept_all = true;
        registry
    }

    /// Registers a directive name. Re-registering is a no-op.
    pub fn register(&mut self, name: &str) {
        let key = SmolStr::new(name.to_ascii_lowercase());
        if self.entries.contains_key(&key) {
            return;
        }
        let entry = DirectiveEntry {
            name: SmolStr::new(name),
            insertion_index: self.next_index,
        };
        self.next_index += 1;
        self.entries.insert(key, entry);
    }

    /// Returns true if `name` should be treated as a directive.
    pub fn is_directive(&self, name: &str) -> bool {
        if self.accept_all {
            return true;
        }
        self.entries.contains_key(name.to_ascii_lowercase().as_str())
    }

    /// Looks up a registered entry by case-insensitive name.
    pub fn entry(&self, name: &str) -> Option<&DirectiveEntry> {
        self.entries.get(name.to_ascii_lowercase().as_str())
    }
}

impl Default for DirectiveRegistry {
    fn default() -> Self {
        Self::with_core_directives()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let registry = DirectiveRegistry::with_core_directives();
        assert!(registry.is_directive("if"));
        assert!(registry.is_directive("If"));
        assert!(registry.is_directive("ENDIF"));
        assert!(!registry.is_directive("disk"));
    }

    #[test]
    fn test_accept_all() {
        let registry = DirectiveRegistry::accept_all();
        assert!(registry.is_directive("disk"));
        assert!(registry.is_directive("anything_at_all"));
    }

    #[test]
    fn test_insertion_index_is_monotonic() {
        let mut registry = DirectiveRegistry::empty();
        registry.register("alpha");
        registry.register("beta");
        registry.register("alpha"); // re-registration keeps the first index
        let alpha = registry.entry("alpha").unwrap();
        let beta = registry.entry("beta").unwrap();
        assert!(alpha.insertion_index < beta.insertion_index);
        assert_eq!(alpha.insertion_index, 0);
    }

    #[test]
    fn test_block_spec_lookup() {
        let spec = block_spec("if").unwrap();
        assert_eq!(spec.closers, &["endif"]);
        assert!(spec.intermediates.contains(&"elseif"));
        assert!(block_spec("endif").is_none());
    }
}

//! Arena indices. Every non-owning edge in the model (a scope's parent, a
//! reference's resolved target, a field's declared type) is one of these
//! rather than a borrowed pointer, so the whole graph lives behind the
//! descriptor's arenas without any lifetime parameter threading through
//! `idlc-core`'s public API.

macro_rules! arena_id {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            #[must_use]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(FileId);
arena_id!(ScopeId);
arena_id!(TypeId);
arena_id!(ValueId);
arena_id!(TypeRefId);
arena_id!(ValueRefId);

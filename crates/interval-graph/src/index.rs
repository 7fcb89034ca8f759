/// Declares a `u32` backed arena index. The maximum value is reserved as the `nil` link, so arena
/// structures can store parent and sibling links without wrapping them in `Option`.
macro_rules! make_index {
    ($vis:vis $name:ident) => {
        /// Arena index.
        #[derive(
            Copy,
            Clone,
            Debug,
            Hash,
            Eq,
            PartialEq,
            Ord,
            PartialOrd,
        )]
        $vis struct $name(u32);

        #[allow(dead_code)]
        impl $name {
            /// Create new index from `usize`.
            #[inline(always)]
            $vis fn new(x: usize) -> Self {
                debug_assert!(x < u32::MAX as usize);
                Self(x as u32)
            }

            /// Returns the index as `usize`.
            #[inline(always)]
            $vis fn index(&self) -> usize { self.0 as usize }

            /// The link that points nowhere.
            #[inline(always)]
            $vis fn nil() -> Self { Self(u32::MAX) }

            #[inline(always)]
            $vis fn is_nil(&self) -> bool { self.0 == u32::MAX }
        }

        impl ::std::default::Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::nil()
            }
        }

        impl ::std::convert::From<usize> for $name {
            #[inline(always)]
            fn from(x: usize) -> Self {
                Self::new(x)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                if self.is_nil() {
                    write!(f, "nil")
                } else {
                    write!(f, "{}", self.0)
                }
            }
        }
    };
}

pub(crate) use make_index;

#[cfg(test)]
mod test {
    #[test]
    fn make_index() {
        make_index!(TestIndex);

        let idx = TestIndex::new(42);

        assert_eq!(idx.index(), 42);
        assert!(!idx.is_nil());
        assert!(TestIndex::nil().is_nil());
        assert_eq!(TestIndex::default(), TestIndex::nil());
        assert_eq!(TestIndex::from(42_usize), idx);
        assert_eq!(format!("{:?}", idx), "TestIndex(42)".to_string());
        assert_eq!(format!("{}", idx), "42".to_string());
        assert_eq!(format!("{}", TestIndex::nil()), "nil".to_string());
    }
}

//! Pinyin key resolver.
//!
//! Every reading the `pinyin` crate knows for a character (heteronyms
//! included) becomes one key; the numeric tone suffix is stripped by
//! `PhoneticKey` normalization, so 行 resolves to `{hang, heng, xing}`.

use pinyin::ToPinyinMulti;
use pungen_core::{KeyResolver, KeySet, PhoneticKey};

#[derive(Debug, Clone, Copy, Default)]
pub struct PinyinResolver;

impl PinyinResolver {
    pub fn new() -> Self {
        Self
    }
}

impl KeyResolver for PinyinResolver {
    fn keys_for(&self, ch: char) -> KeySet {
        match ch.to_pinyin_multi() {
            Some(readings) => readings
                .into_iter()
                .filter_map(|p| PhoneticKey::new(p.with_tone_num_end()))
                .collect(),
            None => KeySet::new(),
        }
    }
}

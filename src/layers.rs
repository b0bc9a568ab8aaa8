use bitflags::bitflags;

bitflags! {
    /// Passes an object takes part in. Assigned once when the object is
    /// added to a `SceneBuilder` and immutable afterwards.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Layers: u32 {
        const DEFAULT = 1 << 0;
        const BLOOM = 1 << 1;
    }
}

impl Default for Layers {
    fn default() -> Self {
        Layers::DEFAULT
    }
}

impl Layers {
    /// Objects sharing any bit with `Layers::BLOOM` are drawn with their own
    /// material in the bloom pass.
    pub fn is_bloom_member(self) -> bool {
        self.intersects(Layers::BLOOM)
    }

    pub fn glowing() -> Self {
        Layers::DEFAULT | Layers::BLOOM
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(pub i64);

impl From<i64> for CollectionId {
    fn from(value: i64) -> Self {
        CollectionId(value)
    }
}

impl From<CollectionId> for i64 {
    fn from(value: CollectionId) -> Self {
        value.0
    }
}

pub mod design;
pub mod evaluate;

pub mod equipment_dataset;
pub mod equipment_item;

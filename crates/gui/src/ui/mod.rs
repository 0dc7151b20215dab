pub mod cuboid_list;
pub mod status_bar;
pub mod toolbar;

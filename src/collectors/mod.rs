pub mod lsblk;
pub mod partitions;

//! VM Inventory
//! Mission: Look up users and their VMs behind a swappable repository interface

pub mod json_store;
pub mod models;

pub use json_store::JsonFileInventory;
pub use models::{UserProfile, Vm};

use anyhow::Result;

/// Data access consumed by the route layer
pub trait VmInventory: Send + Sync {
    /// Profile (with VMs) for `username`, if the user exists
    fn lookup_user(&self, username: &str) -> Result<Option<UserProfile>>;

    /// Every VM across every user
    fn list_vms(&self) -> Result<Vec<Vm>>;

    /// Remove `vm_id` from `username`'s VMs. Returns false if nothing was removed.
    fn delete_vm(&self, username: &str, vm_id: i64) -> Result<bool>;

    fn find_vm(&self, vm_id: i64) -> Result<Option<Vm>> {
        Ok(self.list_vms()?.into_iter().find(|vm| vm.vm_id == vm_id))
    }
}

//! JSON File Inventory
//! Mission: Serve user/VM data from flat JSON files

use crate::inventory::{
    models::{UserProfile, Vm},
    VmInventory,
};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Inventory backed by a per-user data file and a global VM list.
///
/// `users_data` holds an array of user profiles, each with a `vms` array.
/// `vms_all` holds a flat array of VM records and is kept in step on delete.
pub struct JsonFileInventory {
    users_data_path: PathBuf,
    vms_all_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileInventory {
    pub fn new(users_data_path: impl Into<PathBuf>, vms_all_path: impl Into<PathBuf>) -> Self {
        Self {
            users_data_path: users_data_path.into(),
            vms_all_path: vms_all_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn load_profiles(&self) -> Result<Vec<UserProfile>> {
        if !self.users_data_path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.users_data_path).with_context(|| {
            format!("Failed to read {}", self.users_data_path.display())
        })?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid user data in {}", self.users_data_path.display()))
    }
}

impl VmInventory for JsonFileInventory {
    fn lookup_user(&self, username: &str) -> Result<Option<UserProfile>> {
        Ok(self
            .load_profiles()?
            .into_iter()
            .find(|p| p.username == username))
    }

    fn list_vms(&self) -> Result<Vec<Vm>> {
        Ok(self
            .load_profiles()?
            .into_iter()
            .flat_map(|p| p.vms)
            .collect())
    }

    fn delete_vm(&self, username: &str, vm_id: i64) -> Result<bool> {
        let _guard = self.write_lock.lock();

        if !self.users_data_path.exists() {
            return Ok(false);
        }

        // Raw values so fields this service does not model survive the rewrite
        let original = fs::read_to_string(&self.users_data_path).with_context(|| {
            format!("Failed to read {}", self.users_data_path.display())
        })?;
        let mut users: Vec<Value> = serde_json::from_str(&original)
            .with_context(|| format!("Invalid user data in {}", self.users_data_path.display()))?;

        let Some(user) = users
            .iter_mut()
            .find(|u| u.get("username").and_then(Value::as_str) == Some(username))
        else {
            return Ok(false);
        };

        let Some(vms) = user.get_mut("vms").and_then(Value::as_array_mut) else {
            return Ok(false);
        };
        let before = vms.len();
        vms.retain(|vm| !has_vm_id(vm, vm_id));
        if vms.len() == before {
            return Ok(false);
        }

        // Per-user file first, then the global list. A failed second write
        // restores the first so the two files never disagree.
        write_json_atomic(&self.users_data_path, &users)?;

        if let Err(e) = self.remove_from_vms_all(vm_id) {
            error!(vm_id, error = %e, "Failed to update global VM list, rolling back");
            write_atomic(&self.users_data_path, original.as_bytes())
                .context("Rollback of user data failed")?;
            return Err(e);
        }

        info!(username, vm_id, "Deleted VM");
        Ok(true)
    }
}

impl JsonFileInventory {
    fn remove_from_vms_all(&self, vm_id: i64) -> Result<()> {
        if !self.vms_all_path.exists() {
            warn!(path = %self.vms_all_path.display(), "Global VM list missing, skipping");
            return Ok(());
        }
        let contents = fs::read_to_string(&self.vms_all_path)
            .with_context(|| format!("Failed to read {}", self.vms_all_path.display()))?;
        let mut vms_all: Vec<Value> = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid VM list in {}", self.vms_all_path.display()))?;
        vms_all.retain(|vm| !has_vm_id(vm, vm_id));
        write_json_atomic(&self.vms_all_path, &vms_all)
    }
}

fn has_vm_id(vm: &Value, vm_id: i64) -> bool {
    vm.get("vm_id").and_then(Value::as_i64) == Some(vm_id)
}

fn write_json_atomic(path: &Path, value: &[Value]) -> Result<()> {
    let contents = serde_json::to_string_pretty(value)?;
    write_atomic(path, contents.as_bytes())
}

/// Write through a sibling temp file and rename over the target
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn vm(vm_id: i64, owner: &str) -> Value {
        json!({
            "vm_id": vm_id,
            "deployedclustername": format!("cluster-{}", vm_id),
            "deployedclusterdescr": "test cluster",
            "clusterdescr": "3-node",
            "podbox": "pod-a",
            "version": "7.4.2",
            "deployedvmstatus": "running",
            "deployedvmtimestamp": "2024-05-01T12:00:00Z",
            "deployedclusterowner": owner,
        })
    }

    fn user(id: i64, username: &str, vms: Vec<Value>) -> Value {
        json!({
            "id": id,
            "username": username,
            "email": format!("{}@example.com", username),
            "fullname": username.to_uppercase(),
            "authtype": "local",
            "status": "active",
            "spusername": null,
            "userpass": null,
            "vms": vms,
        })
    }

    fn create_test_inventory() -> (JsonFileInventory, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let users = json!([
            user(1, "alice", vec![vm(101, "alice"), vm(102, "alice")]),
            user(2, "bob", vec![vm(201, "bob")]),
        ]);
        let all = json!([vm(101, "alice"), vm(102, "alice"), vm(201, "bob")]);
        fs::write(dir.path().join("users_data.json"), users.to_string()).unwrap();
        fs::write(dir.path().join("vms_all.json"), all.to_string()).unwrap();

        let inventory = JsonFileInventory::new(
            dir.path().join("users_data.json"),
            dir.path().join("vms_all.json"),
        );
        (inventory, dir)
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_lookup_user() {
        let (inventory, _dir) = create_test_inventory();

        let alice = inventory.lookup_user("alice").unwrap().unwrap();
        assert_eq!(alice.id, 1);
        assert_eq!(alice.vms.len(), 2);

        assert!(inventory.lookup_user("carol").unwrap().is_none());
    }

    #[test]
    fn test_list_and_find_vms() {
        let (inventory, _dir) = create_test_inventory();

        let ids: Vec<i64> = inventory.list_vms().unwrap().iter().map(|v| v.vm_id).collect();
        assert_eq!(ids, vec![101, 102, 201]);

        let found = inventory.find_vm(201).unwrap().unwrap();
        assert_eq!(found.deployedclusterowner, "bob");
        assert!(inventory.find_vm(999).unwrap().is_none());
    }

    #[test]
    fn test_missing_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let inventory =
            JsonFileInventory::new(dir.path().join("a.json"), dir.path().join("b.json"));

        assert!(inventory.lookup_user("alice").unwrap().is_none());
        assert!(inventory.list_vms().unwrap().is_empty());
        assert!(!inventory.delete_vm("alice", 101).unwrap());
    }

    #[test]
    fn test_delete_vm_updates_both_files() {
        let (inventory, dir) = create_test_inventory();

        assert!(inventory.delete_vm("alice", 101).unwrap());

        let alice = inventory.lookup_user("alice").unwrap().unwrap();
        assert_eq!(alice.vms.len(), 1);
        assert_eq!(alice.vms[0].vm_id, 102);

        let all = read_json(&dir.path().join("vms_all.json"));
        let ids: Vec<i64> = all
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["vm_id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![102, 201]);
    }

    #[test]
    fn test_delete_vm_only_touches_owner() {
        let (inventory, _dir) = create_test_inventory();

        // bob does not own 101
        assert!(!inventory.delete_vm("bob", 101).unwrap());
        assert!(inventory.find_vm(101).unwrap().is_some());

        assert!(!inventory.delete_vm("alice", 999).unwrap());
        assert!(!inventory.delete_vm("carol", 101).unwrap());
    }

    #[test]
    fn test_delete_preserves_unmodelled_fields() {
        let (inventory, dir) = create_test_inventory();
        let path = dir.path().join("users_data.json");
        let mut users = read_json(&path);
        users[0]["team"] = json!("platform");
        fs::write(&path, users.to_string()).unwrap();

        assert!(inventory.delete_vm("alice", 102).unwrap());
        assert_eq!(read_json(&path)[0]["team"], "platform");
    }

    #[test]
    fn test_delete_without_global_list() {
        let (inventory, dir) = create_test_inventory();
        fs::remove_file(dir.path().join("vms_all.json")).unwrap();

        assert!(inventory.delete_vm("bob", 201).unwrap());
        assert!(inventory.lookup_user("bob").unwrap().unwrap().vms.is_empty());
    }

    #[test]
    fn test_failed_global_write_rolls_back_user_data() {
        let (inventory, dir) = create_test_inventory();
        let users_path = dir.path().join("users_data.json");
        let before = fs::read_to_string(&users_path).unwrap();

        fs::write(dir.path().join("vms_all.json"), "{ corrupt").unwrap();

        assert!(inventory.delete_vm("alice", 101).is_err());
        assert_eq!(fs::read_to_string(&users_path).unwrap(), before);
    }
}

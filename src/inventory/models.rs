//! Inventory Models
//! Mission: Describe user profiles and the VMs deployed for them

use serde::{Deserialize, Serialize};

/// Deployed virtual machine record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vm {
    pub vm_id: i64,
    pub deployedclustername: String,
    pub deployedclusterdescr: String,
    pub clusterdescr: String,
    pub podbox: String,
    pub version: String,
    pub deployedvmstatus: String,
    pub deployedvmtimestamp: String,
    pub deployedclusterowner: String,
}

/// User profile with the VMs it owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub authtype: String,
    pub status: String,
    pub spusername: Option<String>,
    #[serde(default, skip_serializing)]
    pub userpass: Option<String>, // never serialize
    #[serde(default)]
    pub vms: Vec<Vm>,
}

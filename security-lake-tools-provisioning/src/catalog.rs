//! OCSF event class catalog
//!
//! A fixed table of the event classes Security Lake accepts for custom
//! sources, grouped by OCSF category. The catalog is immutable and handed to
//! the orchestrator by reference.

/// Display name used for class uids missing from the catalog
pub const UNKNOWN_CLASS_NAME: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventClass {
    pub uid: u32,
    /// Security Lake event class identifier, e.g. `FILE_ACTIVITY`
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventClassCategory {
    pub name: &'static str,
    pub classes: &'static [EventClass],
}

const fn class(uid: u32, name: &'static str) -> EventClass {
    EventClass { uid, name }
}

static OCSF_CATEGORIES: &[EventClassCategory] = &[
    EventClassCategory {
        name: "System Activity",
        classes: &[
            class(1001, "FILE_ACTIVITY"),
            class(1002, "KERNEL_EXTENSION"),
            class(1003, "KERNEL_ACTIVITY"),
            class(1004, "MEMORY_ACTIVITY"),
            class(1005, "MODULE_ACTIVITY"),
            class(1006, "SCHEDULED_JOB"),
            class(1007, "PROCESS_ACTIVITY"),
            class(1008, "EVENT_LOG"),
            class(1009, "SCRIPT_ACTIVITY"),
        ],
    },
    EventClassCategory {
        name: "Findings",
        classes: &[
            class(2001, "SECURITY_FINDING"),
            class(2002, "VULNERABILITY_FINDING"),
            class(2003, "COMPLIANCE_FINDING"),
            class(2004, "DETECTION_FINDING"),
            class(2005, "INCIDENT_FINDING"),
            class(2006, "DATA_SECURITY_FINDING"),
            class(2007, "APPLICATION_SECURITY_FINDING"),
        ],
    },
    EventClassCategory {
        name: "Identity & Access Management",
        classes: &[
            class(3001, "ACCOUNT_CHANGE"),
            class(3002, "AUTHENTICATION"),
            class(3003, "AUTHORIZE_SESSION"),
            class(3004, "ENTITY_MANAGEMENT"),
            class(3005, "USER_ACCESS"),
            class(3006, "GROUP_MANAGEMENT"),
        ],
    },
    EventClassCategory {
        name: "Network Activity",
        classes: &[
            class(4001, "NETWORK_ACTIVITY"),
            class(4002, "HTTP_ACTIVITY"),
            class(4003, "DNS_ACTIVITY"),
            class(4004, "DHCP_ACTIVITY"),
            class(4005, "RDP_ACTIVITY"),
            class(4006, "SMB_ACTIVITY"),
            class(4007, "SSH_ACTIVITY"),
            class(4008, "FTP_ACTIVITY"),
            class(4009, "EMAIL_ACTIVITY"),
            class(4013, "NTP_ACTIVITY"),
            class(4014, "TUNNEL_ACTIVITY"),
        ],
    },
    EventClassCategory {
        name: "Discovery",
        classes: &[
            class(5001, "DEVICE_INVENTORY"),
            class(5002, "DEVICE_CONFIG_STATE"),
            class(5003, "USER_INVENTORY"),
            class(5004, "OS_PATCH_STATE"),
        ],
    },
    EventClassCategory {
        name: "Application Activity",
        classes: &[
            class(6001, "WEB_RESOURCES"),
            class(6002, "APPLICATION_LIFECYCLE"),
            class(6003, "API_ACTIVITY"),
            class(6005, "DATASTORE_ACTIVITY"),
            class(6006, "FILE_HOSTING"),
            class(6007, "SCAN_ACTIVITY"),
            class(6008, "APPLICATION_ERROR"),
        ],
    },
    EventClassCategory {
        name: "Remediation",
        classes: &[
            class(7001, "REMEDIATION"),
            class(7002, "FILE_REMEDIATION"),
            class(7003, "PROCESS_REMEDIATION"),
        ],
    },
    EventClassCategory {
        name: "Windows Extension",
        classes: &[
            class(201001, "REGISTRY_KEY_ACTIVITY"),
            class(201002, "REGISTRY_VALUE_ACTIVITY"),
            class(201003, "WINDOWS_RESOURCE_ACTIVITY"),
            class(201004, "WINDOWS_SERVICE_ACTIVITY"),
        ],
    },
];

/// Read-only lookup from class uid to event class name
#[derive(Debug, Clone, Copy)]
pub struct EventClassCatalog {
    categories: &'static [EventClassCategory],
}

impl EventClassCatalog {
    /// The OCSF classes supported by Security Lake custom sources
    pub fn ocsf() -> Self {
        Self {
            categories: OCSF_CATEGORIES,
        }
    }

    /// Categories in listing order
    pub fn categories(&self) -> &'static [EventClassCategory] {
        self.categories
    }

    pub fn classes(&self) -> impl Iterator<Item = &'static EventClass> {
        self.categories.iter().flat_map(|category| category.classes)
    }

    pub fn get(&self, uid: u32) -> Option<&'static EventClass> {
        self.classes().find(|class| class.uid == uid)
    }

    pub fn name(&self, uid: u32) -> Option<&'static str> {
        self.get(uid).map(|class| class.name)
    }

    /// Name for display; uids outside the catalog show as `unknown`.
    pub fn display_name(&self, uid: u32) -> &'static str {
        self.name(uid).unwrap_or(UNKNOWN_CLASS_NAME)
    }

    pub fn contains(&self, uid: u32) -> bool {
        self.get(uid).is_some()
    }
}

impl Default for EventClassCatalog {
    fn default() -> Self {
        Self::ocsf()
    }
}

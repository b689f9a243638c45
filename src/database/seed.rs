// Demo data loaded at startup when `database.seed` is enabled
use anyhow::{Context, Result};
use tracing::info;

use crate::database::models::{EmployeeRecord, NewAdmin};
use crate::database::store::{DivisionFilter, EmployeeFilter, Store};
use crate::types::PageRequest;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "pastibisa";

pub const DIVISIONS: [&str; 6] = [
    "Mobile Apps",
    "QA",
    "Full Stack",
    "Backend",
    "Frontend",
    "UI/UX Designer",
];

/// (name, phone, position)
pub const EMPLOYEES: [(&str, &str, &str); 12] = [
    ("Budi Santoso", "081234567891", "Junior Developer"),
    ("Siti Rahayu", "081234567892", "Senior Developer"),
    ("Ahmad Wijaya", "081234567893", "Lead Developer"),
    ("Dewi Lestari", "081234567894", "Quality Assurance"),
    ("Rudi Hermawan", "081234567895", "UI Designer"),
    ("Rina Kusuma", "081234567896", "UX Designer"),
    ("Hendra Pratama", "081234567897", "DevOps Engineer"),
    ("Maya Sari", "081234567898", "Project Manager"),
    ("Doni Setiawan", "081234567899", "System Analyst"),
    ("Fitri Handayani", "081234567800", "Technical Writer"),
    ("Eko Prasetyo", "081234567801", "Mobile Developer"),
    ("Nur Hidayah", "081234567802", "Frontend Developer"),
];

/// Insert the admin, divisions and employees. Each group is skipped when
/// it already has rows, so running this against a seeded store is a no-op.
pub async fn seed(store: &dyn Store, bcrypt_cost: u32) -> Result<()> {
    let probe = PageRequest::new(1, 1);

    if store.find_admin_by_username(ADMIN_USERNAME).await?.is_none() {
        let password_hash =
            bcrypt::hash(ADMIN_PASSWORD, bcrypt_cost).context("failed to hash seed password")?;
        store
            .insert_admin(NewAdmin {
                name: "Administrator".to_string(),
                username: ADMIN_USERNAME.to_string(),
                email: "admin@aksamedia.com".to_string(),
                phone: "081234567890".to_string(),
                password_hash,
            })
            .await?;
        info!("Seeded admin account '{}'", ADMIN_USERNAME);
    }

    let (_, division_count) = store.list_divisions(&DivisionFilter::default(), probe).await?;
    if division_count == 0 {
        for name in DIVISIONS {
            store.insert_division(name).await?;
        }
        info!("Seeded {} divisions", DIVISIONS.len());
    }

    let (_, employee_count) = store.list_employees(&EmployeeFilter::default(), probe).await?;
    if employee_count == 0 {
        let (divisions, _) = store
            .list_divisions(&DivisionFilter::default(), PageRequest::new(1, u32::MAX))
            .await?;
        anyhow::ensure!(!divisions.is_empty(), "no divisions to assign seeded employees to");

        for (index, (name, phone, position)) in EMPLOYEES.iter().enumerate() {
            store
                .insert_employee(EmployeeRecord {
                    name: name.to_string(),
                    phone: phone.to_string(),
                    division_id: divisions[index % divisions.len()].id,
                    position: position.to_string(),
                    image: None,
                })
                .await?;
        }
        info!("Seeded {} employees", EMPLOYEES.len());
    }

    Ok(())
}

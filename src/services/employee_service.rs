use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::models::{Employee, EmployeeChanges, EmployeeRecord, EmployeeView};
use crate::database::{EmployeeFilter, Store};
use crate::error::ApiError;
use crate::services::division_service::non_blank;
use crate::services::images::{ImageKind, ImageStore, ImageUpload};
use crate::types::{Page, PageRequest};
use crate::validation::{self, FieldErrors};

pub const NOT_FOUND_MESSAGE: &str = "Employee not found";
pub const DIVISION_NOT_FOUND_MESSAGE: &str = "Division not found.";

/// The `image` value of a request
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// Uploaded file part
    File(Vec<u8>),
    /// Plain text where a file was expected
    Text(String),
}

/// Fields for a new employee, all still unvalidated
#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub division_id: Option<String>,
    pub position: Option<String>,
    pub image: Option<ImageInput>,
}

/// Partial update. `None` leaves the field unchanged; `Some("")` fails `required`.
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub division_id: Option<String>,
    pub position: Option<String>,
    pub image: Option<ImageInput>,
}

#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn Store>,
    images: Arc<dyn ImageStore>,
    page_size: u32,
    max_upload_kb: usize,
}

impl EmployeeService {
    pub fn new(
        store: Arc<dyn Store>,
        images: Arc<dyn ImageStore>,
        page_size: u32,
        max_upload_kb: usize,
    ) -> Self {
        Self {
            store,
            images,
            page_size,
            max_upload_kb,
        }
    }

    /// One page of employees with their division embedded. Filters combine with AND.
    pub async fn list(
        &self,
        name: Option<&str>,
        division_id: Option<&str>,
        page: Option<&str>,
    ) -> Result<Page<EmployeeView>, ApiError> {
        let request = PageRequest::from_query(page, self.page_size);

        let division_id = match non_blank(division_id) {
            Some(raw) => match Uuid::parse_str(&raw) {
                Ok(id) => Some(id),
                // nothing can reference a malformed id
                Err(_) => return Ok(Page::new(Vec::new(), 0, request)),
            },
            None => None,
        };
        let filter = EmployeeFilter {
            name: non_blank(name),
            division_id,
        };

        let (rows, total) = self.store.list_employees(&filter, request).await?;
        let images = self.images.clone();
        Ok(Page::new(rows, total, request).map(|row| {
            let mut view = EmployeeView::from(row);
            view.image = view.image.map(|reference| images.public_url(&reference));
            view
        }))
    }

    pub async fn create(&self, input: NewEmployee) -> Result<Employee, ApiError> {
        let mut errors = FieldErrors::new();

        let name = self.text(&mut errors, "name", input.name, 255);
        let phone = self.text(&mut errors, "phone", input.phone, 20);
        let division_id = match validation::required(&mut errors, "division_id", input.division_id) {
            Some(raw) => self.division(&mut errors, &raw).await?,
            None => None,
        };
        let position = self.text(&mut errors, "position", input.position, 255);
        let upload = self.image(&mut errors, input.image);

        errors.into_result()?;
        let (Some(name), Some(phone), Some(division_id), Some(position)) =
            (name, phone, division_id, position)
        else {
            return Err(ApiError::internal("employee validation passed with missing fields"));
        };

        let image = match upload {
            Some(upload) => Some(self.images.store(upload).await?),
            None => None,
        };

        let record = EmployeeRecord {
            name,
            phone,
            division_id,
            position,
            image: image.clone(),
        };
        match self.store.insert_employee(record).await {
            Ok(employee) => {
                info!("Created employee {} ({})", employee.id, employee.name);
                Ok(employee)
            }
            Err(e) => {
                if let Some(reference) = image {
                    self.discard_quietly(&reference).await;
                }
                Err(e.into())
            }
        }
    }

    pub async fn update(&self, id: Uuid, patch: EmployeePatch) -> Result<Employee, ApiError> {
        let existing = self
            .store
            .find_employee(id)
            .await?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))?;

        let mut errors = FieldErrors::new();
        let mut changes = EmployeeChanges::default();

        if patch.name.is_some() {
            changes.name = self.text(&mut errors, "name", patch.name, 255);
        }
        if patch.phone.is_some() {
            changes.phone = self.text(&mut errors, "phone", patch.phone, 20);
        }
        if patch.division_id.is_some() {
            if let Some(raw) = validation::required(&mut errors, "division_id", patch.division_id) {
                changes.division_id = self.division(&mut errors, &raw).await?;
            }
        }
        if patch.position.is_some() {
            changes.position = self.text(&mut errors, "position", patch.position, 255);
        }
        let upload = self.image(&mut errors, patch.image);

        errors.into_result()?;

        if let Some(upload) = upload {
            if let Some(old) = &existing.image {
                self.discard_quietly(old).await;
            }
            changes.image = Some(self.images.store(upload).await?);
        }

        if changes.is_empty() {
            return Ok(existing);
        }

        let updated = self
            .store
            .update_employee(id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))?;
        info!("Updated employee {}", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Employee, ApiError> {
        let removed = self
            .store
            .delete_employee(id)
            .await?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND_MESSAGE))?;

        if let Some(reference) = &removed.image {
            self.discard_quietly(reference).await;
        }
        info!("Deleted employee {}", removed.id);
        Ok(removed)
    }

    /// `required|string|max:N`
    fn text(&self, errors: &mut FieldErrors, field: &str, value: Option<String>, max: usize) -> Option<String> {
        let value = validation::required(errors, field, value)?;
        validation::max_chars(errors, field, &value, max).then_some(value)
    }

    /// `uuid|exists:divisions,id`
    async fn division(&self, errors: &mut FieldErrors, raw: &str) -> Result<Option<Uuid>, ApiError> {
        let Some(id) = validation::uuid(errors, "division_id", raw) else {
            return Ok(None);
        };
        if !self.store.division_exists(id).await? {
            errors.add("division_id", DIVISION_NOT_FOUND_MESSAGE);
            return Ok(None);
        }
        Ok(Some(id))
    }

    /// `nullable|image|mimes:jpeg,png,jpg,gif|max:<kb>`
    fn image(&self, errors: &mut FieldErrors, input: Option<ImageInput>) -> Option<ImageUpload> {
        match input? {
            ImageInput::Text(text) => {
                if !text.trim().is_empty() {
                    errors.add("image", "The image field must be an image.");
                }
                None
            }
            ImageInput::File(bytes) if bytes.is_empty() => None,
            ImageInput::File(bytes) => {
                let Some(kind) = ImageKind::sniff(&bytes) else {
                    errors.add("image", "The image field must be a file of type: jpeg, png, jpg, gif.");
                    return None;
                };
                if bytes.len() > self.max_upload_kb * 1024 {
                    errors.add(
                        "image",
                        format!(
                            "The image field must not be greater than {} kilobytes.",
                            self.max_upload_kb
                        ),
                    );
                    return None;
                }
                Some(ImageUpload { kind, bytes })
            }
        }
    }

    async fn discard_quietly(&self, reference: &str) {
        if let Err(e) = self.images.discard(reference).await {
            warn!("Failed to discard image {}: {}", reference, e);
        }
    }
}

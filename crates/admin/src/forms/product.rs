//! Add/edit product form.

use tracing::{info, instrument};

use senji_core::{
    Category, CategoryId, Inventory, Price, Product, ProductId, Size, Variant, VariantList,
    VariantMerge,
};

use super::image::ImageUpload;
use super::submission::{ProductPayload, ProductSubmission};
use super::{FormError, FormWarning, parse_stock};
use crate::api::ApiClient;
use crate::error::ConsoleError;
use crate::services::change_detector::{ProductDraft, has_changes};

/// Result of submitting an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Nothing differed from the loaded product; no request was sent.
    NoChanges,
    /// The backend's copy of the updated product.
    Updated(Product),
}

/// In-progress state of an add or edit product form.
#[derive(Debug, Clone)]
pub struct ProductForm {
    /// Set when editing; `None` for a new product.
    product_id: Option<ProductId>,
    editing: bool,
    categories: Vec<Category>,
    name: String,
    price: String,
    category: Option<CategoryId>,
    description: String,
    variants: VariantList,
    stock: u32,
    image: Option<ImageUpload>,
    /// Whether to track sizes when the selected category is not loaded.
    sized_fallback: bool,
}

impl ProductForm {
    /// Empty form for a new product.
    #[must_use]
    pub const fn new(categories: Vec<Category>) -> Self {
        Self {
            product_id: None,
            editing: false,
            categories,
            name: String::new(),
            price: String::new(),
            category: None,
            description: String::new(),
            variants: VariantList::new(),
            stock: 0,
            image: None,
            sized_fallback: true,
        }
    }

    /// Form pre-filled from a loaded product.
    #[must_use]
    pub fn edit(product: &Product, categories: Vec<Category>) -> Self {
        let (variants, stock) = match &product.inventory {
            Inventory::Sized(list) => (list.clone(), 0),
            Inventory::Flat(stock) => (VariantList::new(), *stock),
        };
        let mut form = Self {
            product_id: Some(product.id.clone()).filter(|id| !id.as_str().trim().is_empty()),
            editing: true,
            categories: Vec::new(),
            name: product.name.clone(),
            price: product.price.amount().to_string(),
            category: Some(CategoryId::new(product.category.as_str())),
            description: product.description.clone(),
            variants,
            stock,
            image: None,
            sized_fallback: product.uses_sizes(),
        };
        form.set_categories(categories);
        form
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Replace the loaded categories.
    ///
    /// A selection that names a category rather than its id is rewritten to
    /// the matching id.
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
        if let Some(selected) = &self.category
            && !self.categories.iter().any(|c| &c.id == selected)
            && let Some(named) = self.categories.iter().find(|c| c.name == selected.as_str())
        {
            self.category = Some(named.id.clone());
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Select a category.
    ///
    /// Changing category resets the flat stock to zero, and choosing one
    /// that does not use sizes drops any variants.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingCategory` if the id is not a loaded
    /// category.
    pub fn select_category(&mut self, id: &CategoryId) -> Result<(), FormError> {
        let category = self
            .categories
            .iter()
            .find(|c| &c.id == id)
            .ok_or(FormError::MissingCategory)?;
        if self.category.as_ref() != Some(id) {
            self.stock = 0;
        }
        if !category.uses_sizes {
            self.variants.clear();
        }
        self.category = Some(id.clone());
        Ok(())
    }

    /// The selected category, when it is loaded.
    #[must_use]
    pub fn selected_category(&self) -> Option<&Category> {
        let id = self.category.as_ref()?;
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Whether stock is tracked per size for the selected category.
    #[must_use]
    pub fn uses_sizes(&self) -> bool {
        self.selected_category()
            .map_or(self.sized_fallback, |c| c.uses_sizes)
    }

    // =========================================================================
    // Fields
    // =========================================================================

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Set the price as typed; validated on submit.
    pub fn set_price(&mut self, price: impl Into<String>) {
        self.price = price.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn price(&self) -> &str {
        &self.price
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn product_id(&self) -> Option<&ProductId> {
        self.product_id.as_ref()
    }

    // =========================================================================
    // Stock
    // =========================================================================

    /// Add stock for a size, merging into an existing entry for that size.
    ///
    /// Returns a warning when the size was already present.
    ///
    /// # Errors
    ///
    /// - `FormError::SizesNotSupported` if the category does not use sizes
    /// - `FormError::InvalidStock` for blank, negative or non-numeric stock
    pub fn add_variant(&mut self, size: Size, stock: &str) -> Result<Option<FormWarning>, FormError> {
        if !self.uses_sizes() {
            return Err(FormError::SizesNotSupported);
        }
        let stock = parse_stock(stock)?;
        Ok(match self.variants.add(size, stock) {
            VariantMerge::Added => None,
            VariantMerge::Merged { size, .. } => Some(FormWarning::DuplicateSize(size)),
        })
    }

    /// Remove the variant at `index`.
    pub fn remove_variant(&mut self, index: usize) -> Option<Variant> {
        self.variants.remove(index)
    }

    /// Remove the variant for `size`.
    pub fn remove_size(&mut self, size: Size) -> Option<Variant> {
        self.variants.remove_size(size)
    }

    #[must_use]
    pub const fn variants(&self) -> &VariantList {
        &self.variants
    }

    /// Set the flat stock for a category without sizes.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidStock` for blank, negative or non-numeric
    /// input.
    pub fn set_stock(&mut self, stock: &str) -> Result<(), FormError> {
        self.stock = parse_stock(stock)?;
        Ok(())
    }

    #[must_use]
    pub const fn stock(&self) -> u32 {
        self.stock
    }

    // =========================================================================
    // Image
    // =========================================================================

    /// Attach an image; replaces any previous selection.
    pub fn select_image(&mut self, image: ImageUpload) {
        self.image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    #[must_use]
    pub const fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    // =========================================================================
    // Submission
    // =========================================================================

    fn validated_price(&self) -> Result<Price, FormError> {
        Price::parse(&self.price)
            .ok()
            .filter(Price::is_positive)
            .ok_or(FormError::InvalidPrice)
    }

    fn payload(&self, category: CategoryId, price: Price) -> ProductPayload {
        let sized = self.uses_sizes();
        ProductPayload {
            name: self.name.trim().to_string(),
            price,
            category_name: if self.editing {
                None
            } else {
                self.selected_category().map(|c| c.name.clone())
            },
            category,
            description: self.description.trim().to_string(),
            variants: sized.then(|| self.variants.as_slice().to_vec()),
            stock: (!sized).then_some(self.stock),
        }
    }

    /// Validate a new product and build its submission.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule, checked in form order: name, price,
    /// category, image, then variants or stock.
    pub fn new_submission(&self) -> Result<ProductSubmission, ConsoleError> {
        if self.name.trim().is_empty() {
            return Err(FormError::MissingName.into());
        }
        let price = self.validated_price()?;
        let category = self.category.clone().ok_or(FormError::MissingCategory)?;
        let image = self.image.clone().ok_or(FormError::MissingImage)?;
        if self.uses_sizes() {
            if self.variants.is_empty() {
                return Err(FormError::MissingVariants.into());
            }
        } else if self.stock == 0 {
            return Err(FormError::InvalidStock.into());
        }

        Ok(ProductSubmission::build(
            self.payload(category, price),
            Some(image),
        )?)
    }

    /// Validate an edit and build its submission.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingProductId` when the form was not opened on
    /// a saved product, or the first failing field rule.
    pub fn edit_submission(&self) -> Result<(ProductId, ProductSubmission), ConsoleError> {
        let id = self.product_id.clone().ok_or(FormError::MissingProductId)?;
        if self.name.trim().is_empty() {
            return Err(FormError::MissingName.into());
        }
        let price = self.validated_price()?;
        let category = self.category.clone().ok_or(FormError::MissingCategory)?;

        let submission = ProductSubmission::build(self.payload(category, price), self.image.clone())?;
        Ok((id, submission))
    }

    /// Create the product.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request, or the backend's
    /// error.
    #[instrument(skip(self, api), fields(name = %self.name))]
    pub async fn submit_new(&self, api: &ApiClient) -> Result<Product, ConsoleError> {
        let submission = self.new_submission()?;
        let product = api.create_product(&submission).await?;
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Submit an edit of `original`.
    ///
    /// Nothing is sent when the fields match `original` and no new image
    /// was chosen.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request, or the backend's
    /// error.
    #[instrument(skip(self, api, original), fields(product_id = %original.id))]
    pub async fn submit_edit(
        &self,
        api: &ApiClient,
        original: &Product,
    ) -> Result<EditOutcome, ConsoleError> {
        let (id, submission) = self.edit_submission()?;
        let candidate = submission.normalize()?;
        let baseline = ProductDraft::from_product_in(original, &self.categories);

        if !submission.has_image() && !has_changes(&candidate, &baseline) {
            info!("No changes detected, skipping update");
            return Ok(EditOutcome::NoChanges);
        }

        let product = api.update_product(&id, &submission).await?;
        info!("Product updated");
        Ok(EditOutcome::Updated(product))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use senji_core::CategoryRef;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: CategoryId::new("c-shirts"),
                name: "Shirts".to_string(),
                uses_sizes: true,
            },
            Category {
                id: CategoryId::new("c-mugs"),
                name: "Mugs".to_string(),
                uses_sizes: false,
            },
        ]
    }

    fn image() -> ImageUpload {
        ImageUpload::new("tee.png", "image/png", vec![0; 4]).unwrap()
    }

    fn tee() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Tee".to_string(),
            price: Price::from_cents(1000),
            category: CategoryRef::Id(CategoryId::new("c-shirts")),
            description: String::new(),
            image_url: None,
            inventory: Inventory::Sized(VariantList::from_variants([Variant::new(Size::S, 5)])),
        }
    }

    fn form_error(result: Result<ProductSubmission, ConsoleError>) -> FormError {
        match result {
            Err(ConsoleError::Form(e)) => e,
            other => panic!("expected a form error, got {other:?}"),
        }
    }

    #[test]
    fn test_new_product_validation_order() {
        let mut form = ProductForm::new(categories());
        assert_eq!(form_error(form.new_submission()), FormError::MissingName);

        form.set_name("Tee");
        form.set_price("0");
        assert_eq!(form_error(form.new_submission()), FormError::InvalidPrice);

        form.set_price("12.50");
        assert_eq!(form_error(form.new_submission()), FormError::MissingCategory);

        form.select_category(&CategoryId::new("c-shirts")).unwrap();
        assert_eq!(form_error(form.new_submission()), FormError::MissingImage);

        form.select_image(image());
        assert_eq!(form_error(form.new_submission()), FormError::MissingVariants);

        form.add_variant(Size::M, "3").unwrap();
        let submission = form.new_submission().unwrap();
        let ProductSubmission::Multipart(multipart) = submission else {
            panic!("new products are sent as multipart");
        };
        assert_eq!(multipart.field("category_id"), Some("c-shirts"));
        assert_eq!(multipart.field("category_name"), Some("Shirts"));
        assert_eq!(multipart.field("variants"), Some(r#"[{"size":"M","stock":3}]"#));
    }

    #[test]
    fn test_flat_category_requires_stock() {
        let mut form = ProductForm::new(categories());
        form.set_name("Mug");
        form.set_price("8");
        form.select_category(&CategoryId::new("c-mugs")).unwrap();
        form.select_image(image());
        assert_eq!(form_error(form.new_submission()), FormError::InvalidStock);

        form.set_stock("4").unwrap();
        let submission = form.new_submission().unwrap();
        let ProductSubmission::Multipart(multipart) = submission else {
            panic!("new products are sent as multipart");
        };
        assert_eq!(multipart.field("stock"), Some("4"));
        assert_eq!(multipart.field("variants"), None);
    }

    #[test]
    fn test_duplicate_size_merges_with_warning() {
        let mut form = ProductForm::new(categories());
        form.select_category(&CategoryId::new("c-shirts")).unwrap();
        assert_eq!(form.add_variant(Size::S, "5"), Ok(None));
        assert_eq!(
            form.add_variant(Size::S, "3"),
            Ok(Some(FormWarning::DuplicateSize(Size::S)))
        );
        assert_eq!(form.variants().len(), 1);
        assert_eq!(form.variants().stock_for(Size::S), Some(8));
    }

    #[test]
    fn test_add_variant_rejections() {
        let mut form = ProductForm::new(categories());
        form.select_category(&CategoryId::new("c-shirts")).unwrap();
        assert_eq!(form.add_variant(Size::S, ""), Err(FormError::InvalidStock));
        assert_eq!(form.add_variant(Size::S, "-2"), Err(FormError::InvalidStock));

        form.select_category(&CategoryId::new("c-mugs")).unwrap();
        assert_eq!(
            form.add_variant(Size::S, "2"),
            Err(FormError::SizesNotSupported)
        );
    }

    #[test]
    fn test_category_change_resets_stock_and_variants() {
        let mut form = ProductForm::new(categories());
        form.select_category(&CategoryId::new("c-shirts")).unwrap();
        form.add_variant(Size::L, "2").unwrap();
        form.set_stock("9").unwrap();

        form.select_category(&CategoryId::new("c-mugs")).unwrap();
        assert!(form.variants().is_empty());
        assert_eq!(form.stock(), 0);

        assert_eq!(
            form.select_category(&CategoryId::new("nope")),
            Err(FormError::MissingCategory)
        );
    }

    #[test]
    fn test_edit_resolves_category_by_name() {
        let mut product = tee();
        product.category = CategoryRef::Name("Shirts".to_string());
        let form = ProductForm::edit(&product, categories());
        assert_eq!(form.selected_category().unwrap().id.as_str(), "c-shirts");
        assert!(form.uses_sizes());
    }

    #[test]
    fn test_edit_without_id_is_rejected() {
        let mut product = tee();
        product.id = ProductId::new("");
        let form = ProductForm::edit(&product, categories());
        match form.edit_submission() {
            Err(ConsoleError::Form(FormError::MissingProductId)) => {}
            other => panic!("expected missing product id, got {other:?}"),
        }
    }

    #[test]
    fn test_edit_without_image_is_json() {
        let form = ProductForm::edit(&tee(), categories());
        let (id, submission) = form.edit_submission().unwrap();
        assert_eq!(id.as_str(), "p1");
        assert!(!submission.has_image());
    }

    #[test]
    fn test_untouched_edit_with_padded_description_is_not_a_change() {
        let original = Product {
            description: "Soft cotton\n".to_string(),
            ..tee()
        };
        let form = ProductForm::edit(&original, categories());

        let (_, submission) = form.edit_submission().unwrap();
        let candidate = submission.normalize().unwrap();
        let baseline = ProductDraft::from_product_in(&original, form.categories());

        assert_eq!(candidate.description, "Soft cotton");
        assert!(!has_changes(&candidate, &baseline));
    }

    #[tokio::test]
    async fn test_unchanged_edit_sends_nothing() {
        use crate::config::ApiConfig;
        use crate::session::CredentialStore;

        // Nothing listens here; any request would fail.
        let api = ApiClient::new(
            &ApiConfig::new("http://127.0.0.1:9/api").unwrap(),
            CredentialStore::new(),
        )
        .unwrap();
        let original = tee();
        let mut form = ProductForm::edit(&original, categories());
        form.set_price("10.00");

        let outcome = form.submit_edit(&api, &original).await.unwrap();
        assert_eq!(outcome, EditOutcome::NoChanges);
    }
}

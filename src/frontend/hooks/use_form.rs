use leptos::html::Form;
use leptos::prelude::*;

use crate::table::ValidationRules;

/// Return type for use_form hook
pub struct UseFormReturn<F: Send + Sync + 'static> {
    pub form_el: NodeRef<Form>,
    pub form_data: RwSignal<F>,
    pub form_rules: RwSignal<ValidationRules>,
}

/// Hook holding a form's data and validation rules
///
/// Rules are handed to whatever validates the form; they are not evaluated here.
///
/// # Example
/// ```rust,ignore
/// let form = use_form(Filter::default(), ValidationRules::new());
///
/// view! {
///     <form node_ref=form.form_el>
///         <input
///             prop:value=move || form.form_data.with(|f| f.keyword.clone())
///             on:input=move |ev| form.form_data.update(|f| f.keyword = event_target_value(&ev))
///         />
///     </form>
/// }
/// ```
pub fn use_form<F>(default_form_data: F, default_form_rules: ValidationRules) -> UseFormReturn<F>
where
    F: Send + Sync + 'static,
{
    UseFormReturn {
        form_el: NodeRef::new(),
        form_data: RwSignal::new(default_form_data),
        form_rules: RwSignal::new(default_form_rules),
    }
}

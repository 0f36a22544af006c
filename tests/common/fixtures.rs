use formscan::crawl::inventory::{PageInfo, SiteInfo, SiteStructure};
use formscan::extract::element_model::{Page, RawElement};

pub fn page(url: &str) -> Page {
    Page {
        url: url.to_string(),
        slug: String::new(),
        title: "Fixture".to_string(),
    }
}

pub fn element(id: &str, name: &str) -> RawElement {
    RawElement {
        id: id.to_string(),
        tag_name: "input".to_string(),
        r#type: "text".to_string(),
        name: name.to_string(),
        value: None,
        options: None,
        form_id: None,
        form_name: None,
        page_url: None,
    }
}

pub fn element_in_form(id: &str, name: &str, form_id: &str) -> RawElement {
    let mut el = element(id, name);
    el.form_id = Some(form_id.to_string());
    el
}

pub fn structure(short_name: Option<&str>, slugs: &[(&str, bool)]) -> SiteStructure {
    SiteStructure {
        pages: slugs
            .iter()
            .map(|(slug, published)| PageInfo {
                slug: slug.to_string(),
                title: slug.to_string(),
                published: *published,
            })
            .collect(),
        site: SiteInfo {
            short_name: short_name.map(|s| s.to_string()),
        },
    }
}

/// The contact-form markup used across scanner tests.
pub const CONTACT_PAGE: &str = r#"
<html><body>
<form id="wf-form-Contact" data-name="Contact Form">
  <input id="full-name" name="full-name" type="text">
  <input id="email" name="email" type="email">
  <select id="country" name="country">
    <option value="">Select...</option>
    <option value="US">United States</option>
    <option value="CA">Canada</option>
  </select>
  <input type="submit" value="Send">
</form>
</body></html>
"#;

//! NETCONF edit-config wire serialization for rendered requests.

use netconf_xml_core::{write, WriteError, XmlNode};

use crate::model::RenderedRequest;

/// Base NETCONF namespace carried on the `<config>` wrapper.
pub const NETCONF_BASE_NS: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";

/// Wrap a rendered request in the `<config><configuration>` document a
/// NETCONF edit-config call expects.
pub fn edit_config_document(request: &RenderedRequest) -> XmlNode {
    let mut config = XmlNode::new("config");
    config.set_attr("xmlns", NETCONF_BASE_NS);
    let mut configuration = XmlNode::new("configuration");
    configuration.children.push(request.tree.clone());
    config.children.push(configuration);
    config
}

/// Serialize a rendered request as an edit-config XML string.
pub fn to_xml(request: &RenderedRequest) -> Result<String, WriteError> {
    let bytes = write(&edit_config_document(request))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::{to_xml, NETCONF_BASE_NS};
    use crate::model::RenderedRequest;
    use netconf_xml_core::parse;

    #[test]
    fn request_is_wrapped_in_edit_config_document() {
        let request = RenderedRequest {
            anchor: "firewall/family/inet/filter".to_string(),
            tree: parse(b"<firewall><family><inet><filter><name>f1</name></filter></inet></family></firewall>")
                .expect("tree parse"),
        };

        let xml = to_xml(&request).expect("serialize");
        assert!(xml.starts_with("<config"));
        assert!(xml.contains(NETCONF_BASE_NS));
        assert!(xml.contains("<configuration>"));
        assert!(xml.contains("<name>f1</name>"));
    }
}

use super::*;

pub async fn sleep(_duration: Duration) {}

pub fn dispatch_custom_event(_event: &Event) -> Result<bool, String> {
    Ok(true)
}

pub fn create_host(
    _node: NodeId,
    _tag: &str,
    _attributes: &[(String, String)],
) -> Result<(), String> {
    Ok(())
}

pub fn mount_shadow(_node: NodeId, _html: &str) -> Result<(), String> {
    Ok(())
}

pub fn set_host_attribute(_node: NodeId, _name: &str, _value: Option<&str>) -> Result<(), String> {
    Ok(())
}

pub fn set_live(_node: NodeId, _live: &LiveControl) -> Result<(), String> {
    Ok(())
}

pub fn listen(_node: NodeId, _handler: ControlHandler) -> Result<(), String> {
    Ok(())
}

pub fn append_live_region(_node: NodeId, _message: &str) -> Result<(), String> {
    Ok(())
}

pub fn remove_host(_node: NodeId) -> Result<(), String> {
    Ok(())
}

pub fn schedule(_delay_ms: u64, _callback: impl FnOnce() + 'static) {}

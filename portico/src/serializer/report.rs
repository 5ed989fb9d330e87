use portico_proto::Element;
use portico_proto::encoding::utc;

use super::id_opt;
use crate::entities::{GetRequest, ListRequest};

pub(super) fn activity(tag: &str, r: &ListRequest) -> Element {
    Element::new(tag)
        .leaf_opt("RptStartUtcDT", r.start.map(utc))
        .leaf_opt("RptEndUtcDT", r.end.map(utc))
}

pub(super) fn detail(tag: &str, r: &GetRequest) -> Element {
    Element::new(tag).leaf_opt("TxnId", id_opt(r.transaction_id))
}

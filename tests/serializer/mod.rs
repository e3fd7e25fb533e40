//! End-to-end path-addressing tests: compile a module through the real
//! loader/resolver, then address its data tree with [`yangc::serializer`].

pub mod tests_resource_id;

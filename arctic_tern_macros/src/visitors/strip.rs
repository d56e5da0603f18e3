use syn::visit_mut::{self, VisitMut};
use syn::{Attribute, Field, ItemEnum, ItemMod, ItemStruct, ItemTrait, TraitItemConst, TraitItemFn};

use crate::attributes::is_helper;

/// Removes the inert helper attributes so the module compiles as written.
pub struct HelperAttributeStripper;

impl HelperAttributeStripper {
    /// Strips the top-level items of an inline module.
    pub fn strip_module(module: &mut ItemMod) {
        if let Some((_, items)) = &mut module.content {
            for item in items {
                HelperAttributeStripper.visit_item_mut(item);
            }
        }
    }
}

fn strip(attrs: &mut Vec<Attribute>) {
    attrs.retain(|attr| !is_helper(attr));
}

impl VisitMut for HelperAttributeStripper {
    fn visit_item_struct_mut(&mut self, item: &mut ItemStruct) {
        strip(&mut item.attrs);
        visit_mut::visit_item_struct_mut(self, item);
    }

    fn visit_field_mut(&mut self, field: &mut Field) {
        strip(&mut field.attrs);
        visit_mut::visit_field_mut(self, field);
    }

    fn visit_item_trait_mut(&mut self, item: &mut ItemTrait) {
        strip(&mut item.attrs);
        visit_mut::visit_item_trait_mut(self, item);
    }

    fn visit_trait_item_fn_mut(&mut self, item: &mut TraitItemFn) {
        strip(&mut item.attrs);
    }

    fn visit_trait_item_const_mut(&mut self, item: &mut TraitItemConst) {
        strip(&mut item.attrs);
    }

    fn visit_item_enum_mut(&mut self, item: &mut ItemEnum) {
        strip(&mut item.attrs);
    }

    // Nested modules are left alone.
    fn visit_item_mod_mut(&mut self, _item: &mut ItemMod) {}
}

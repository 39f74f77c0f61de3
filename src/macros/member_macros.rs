//! Member enumeration macros for cyclesim models

/// Build the return value of [`Model::members`](crate::core::components::Model::members)
/// from field names
///
/// Groups are optional but must appear in this order; members are listed
/// group by group in declaration order.
///
/// # Example
/// ```ignore
/// fn members(&self) -> Vec<(String, Member<'_>)> {
///     members![self;
///         signals: [clk, reset, out],
///         submodules: [adder],
///         signal_lists: [taps],
///         submodule_lists: [stages],
///     ]
/// }
/// ```
#[macro_export]
macro_rules! members {
    (
        $self:ident;
        $(signals: [$($signal:ident),* $(,)?] $(,)?)?
        $(submodules: [$($module:ident),* $(,)?] $(,)?)?
        $(signal_lists: [$($signal_list:ident),* $(,)?] $(,)?)?
        $(submodule_lists: [$($module_list:ident),* $(,)?] $(,)?)?
    ) => {
        {
            let mut members: Vec<(String, $crate::core::components::Member<'_>)> = Vec::new();
            $(
                $(
                    members.push((
                        stringify!($signal).to_string(),
                        $crate::core::components::Member::Signal($self.$signal),
                    ));
                )*
            )?
            $(
                $(
                    members.push((
                        stringify!($module).to_string(),
                        $crate::core::components::Member::Module(&$self.$module),
                    ));
                )*
            )?
            $(
                $(
                    members.push((
                        stringify!($signal_list).to_string(),
                        $crate::core::components::Member::signals(&$self.$signal_list),
                    ));
                )*
            )?
            $(
                $(
                    members.push((
                        stringify!($module_list).to_string(),
                        $crate::core::components::Member::modules(&$self.$module_list),
                    ));
                )*
            )?
            members
        }
    };
}

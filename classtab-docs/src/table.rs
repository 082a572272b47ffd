//! Pure summary table construction.
//!
//! Turns the members collected from one class block into a
//! [`SummaryTable`]: one column per kind, one row per member index, blank
//! placeholders where a kind runs out of members.

use classtab_core::config::Labels;
use classtab_core::model::{HeaderCell, Member, MemberCell, MemberKind, SummaryTable};

/// Members of one class, grouped by kind in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassMembers {
    by_kind: [Vec<Member>; 3],
}

impl ClassMembers {
    /// Appends a member to its kind's column.
    pub fn push(&mut self, member: Member) {
        self.by_kind[member.kind.column()].push(member);
    }

    /// Members of `kind`.
    #[must_use]
    pub fn of(&self, kind: MemberKind) -> &[Member] {
        &self.by_kind[kind.column()]
    }

    /// Number of members of `kind`.
    #[must_use]
    pub fn count(&self, kind: MemberKind) -> usize {
        self.by_kind[kind.column()].len()
    }

    /// Length of the longest column; the number of data rows.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.by_kind.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Total members across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.by_kind.iter().map(Vec::len).sum()
    }
}

impl FromIterator<Member> for ClassMembers {
    fn from_iter<T: IntoIterator<Item = Member>>(iter: T) -> Self {
        let mut members = Self::default();
        for member in iter {
            members.push(member);
        }
        members
    }
}

/// Builds the summary table for one class.
#[must_use]
pub fn build_table(members: &ClassMembers, labels: &Labels) -> SummaryTable {
    let header = MemberKind::ALL.map(|kind| {
        (members.count(kind) > 0).then(|| HeaderCell {
            kind,
            label: labels.for_kind(kind).to_string(),
        })
    });

    let rows = (0..members.max_len())
        .map(|i| {
            MemberKind::ALL.map(|kind| members.of(kind).get(i).map(MemberCell::for_member))
        })
        .collect();

    SummaryTable { header, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn member(kind: MemberKind, name: &str) -> Member {
        Member {
            kind,
            name: name.to_string(),
            anchor: format!("pkg.Cls.{name}"),
        }
    }

    #[test]
    fn test_two_properties_one_method() {
        let members: ClassMembers = [
            member(MemberKind::Property, "x"),
            member(MemberKind::Method, "run"),
            member(MemberKind::Property, "y"),
        ]
        .into_iter()
        .collect();

        let table = build_table(&members, &Labels::default());

        assert_eq!(table.rows.len(), 2);
        let header: Vec<_> = table
            .header
            .iter()
            .map(|h| h.as_ref().map(|h| h.label.as_str()))
            .collect();
        assert_eq!(header, [Some("Properties"), None, Some("Methods")]);

        let labels = |row: usize| -> Vec<Option<String>> {
            table.rows[row]
                .iter()
                .map(|c| c.as_ref().map(|c| c.label.clone()))
                .collect()
        };
        assert_eq!(labels(0), [Some("x".into()), None, Some("run()".into())]);
        assert_eq!(labels(1), [Some("y".into()), None, None]);
    }

    #[test]
    fn test_empty_class_has_no_rows_or_labels() {
        let table = build_table(&ClassMembers::default(), &Labels::default());
        assert!(table.rows.is_empty());
        assert_eq!(table.header_labels(), 0);
    }

    #[test]
    fn test_anchor_carried_into_cell() {
        let members: ClassMembers = std::iter::once(member(MemberKind::Attribute, "mode")).collect();
        let table = build_table(&members, &Labels::default());
        let cell = table.rows[0][1].as_ref().unwrap();
        assert_eq!(cell.href(), "#pkg.Cls.mode");
        assert_eq!(cell.kind, MemberKind::Attribute);
    }

    #[test]
    fn test_custom_labels() {
        let labels = Labels {
            methods: "Functions".to_string(),
            ..Labels::default()
        };
        let members: ClassMembers = std::iter::once(member(MemberKind::Method, "f")).collect();
        let table = build_table(&members, &labels);
        assert_eq!(table.header[2].as_ref().unwrap().label, "Functions");
    }

    fn kind_strategy() -> impl Strategy<Value = MemberKind> {
        prop_oneof![
            Just(MemberKind::Property),
            Just(MemberKind::Attribute),
            Just(MemberKind::Method),
        ]
    }

    proptest! {
        #[test]
        fn prop_row_count_is_longest_column(
            entries in prop::collection::vec((kind_strategy(), "[a-z_]{1,8}\\]?"), 0..40)
        ) {
            let members: ClassMembers = entries
                .iter()
                .map(|(kind, name)| member(*kind, name))
                .collect();
            let table = build_table(&members, &Labels::default());

            let p = members.count(MemberKind::Property);
            let a = members.count(MemberKind::Attribute);
            let m = members.count(MemberKind::Method);
            prop_assert_eq!(table.rows.len(), p.max(a).max(m));
            prop_assert_eq!(table.cell_count(), entries.len());

            for kind in MemberKind::ALL {
                prop_assert_eq!(table.header[kind.column()].is_some(), members.count(kind) > 0);
            }
        }

        #[test]
        fn prop_cells_follow_member_order(
            names in prop::collection::vec("[a-z]{1,6}", 1..20)
        ) {
            let members: ClassMembers = names
                .iter()
                .map(|n| member(MemberKind::Method, n))
                .collect();
            let table = build_table(&members, &Labels::default());
            for (i, name) in names.iter().enumerate() {
                let cell = table.rows[i][2].as_ref().unwrap();
                prop_assert_eq!(&cell.label, &format!("{name}()"));
                prop_assert!(table.rows[i][0].is_none());
                prop_assert!(table.rows[i][1].is_none());
            }
        }
    }
}
